// Dashboard View Controller
//
// Navigation → request one API endpoint → typed Screen → full replacement of
// a single output container, plus visibility of one refresh control.
//
// - view:       which ranking is shown, and the actions a front end sends
// - screen:     typed view-model every front end binds to
// - render:     envelope → Screen
// - api:        endpoint contract (DashboardApi) and request errors
// - controller: Dashboard (dispatcher, current view, superseded-request guard)
// - html:       HTML container + page rendering (server front end)
// - http:       reqwest implementation of DashboardApi

pub mod api;
pub mod controller;
pub mod html;
pub mod render;
pub mod screen;
pub mod view;

#[cfg(feature = "client")]
pub mod http;

pub use api::{DashboardApi, Endpoint, RequestError};
pub use controller::{Dashboard, ScreenBuffer, Surface};
pub use html::HtmlSurface;
pub use screen::{GenerationView, Screen, TableView, Update};
pub use view::{Action, View};

#[cfg(feature = "client")]
pub use http::HttpApi;
