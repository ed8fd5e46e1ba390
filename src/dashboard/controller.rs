// Dashboard controller
//
// Holds the current view and the output surface. Every load:
//   1. takes a ticket and shows its loading screen
//   2. awaits one API call (no lock held)
//   3. writes the result only if its ticket is still the latest
// so a slow, superseded response never overwrites a newer one.

use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::debug;

use super::api::DashboardApi;
use super::render;
use super::screen::{Screen, Update, GENERATING, LOADING};
use super::view::{Action, View};

/// Where the dashboard draws: one container and one refresh control
pub trait Surface {
    /// Replace the whole container content
    fn replace(&mut self, screen: &Screen);

    fn set_refresh_visible(&mut self, visible: bool);
}

/// Surface that keeps the typed screen (terminal UI, tests)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScreenBuffer {
    pub screen: Screen,
    pub refresh_visible: bool,
    /// Number of container replacements so far
    pub replacements: usize,
}

impl Surface for ScreenBuffer {
    fn replace(&mut self, screen: &Screen) {
        self.screen = screen.clone();
        self.replacements += 1;
    }

    fn set_refresh_visible(&mut self, visible: bool) {
        self.refresh_visible = visible;
    }
}

struct State<S> {
    current: View,
    latest_ticket: u64,
    surface: S,
}

impl<S: Surface> State<S> {
    fn apply(&mut self, update: &Update) {
        self.surface.replace(&update.screen);
        if let Some(visible) = update.refresh_visible {
            self.surface.set_refresh_visible(visible);
        }
    }
}

pub struct Dashboard<A, S> {
    api: A,
    state: Mutex<State<S>>,
}

impl<A, S> Dashboard<A, S>
where
    A: DashboardApi,
    S: Surface + Send,
{
    pub fn new(api: A, surface: S) -> Self {
        Self::with_view(api, surface, View::default())
    }

    /// Start with a known current view (e.g. carried in a page URL)
    pub fn with_view(api: A, surface: S, current: View) -> Self {
        Self {
            api,
            state: Mutex::new(State {
                current,
                latest_ticket: 0,
                surface,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, State<S>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn current_view(&self) -> View {
        self.lock().current
    }

    /// Read the surface under the controller lock
    pub fn read_surface<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&self.lock().surface)
    }

    pub fn into_surface(self) -> S {
        self.state
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
            .surface
    }

    // ========================================================================
    // DISPATCH
    // ========================================================================

    /// Single entry point for front-end events
    pub async fn dispatch(&self, action: Action) {
        match action {
            Action::Initialize => self.initialize().await,
            Action::Navigate(view) => self.navigate(view).await,
            Action::Refresh => self.refresh().await,
            Action::LegacyTop10 => self.load_legacy_top10().await,
        }
    }

    /// Default load on page ready
    pub async fn initialize(&self) {
        self.navigate(View::Faturamento).await;
    }

    /// Menu click; ranking views become the current view
    pub async fn navigate(&self, view: View) {
        if view.is_ranking() {
            self.lock().current = view;
        }
        self.load(view, false).await;
    }

    /// Reload the current view with the refresh flag set
    pub async fn refresh(&self) {
        let view = self.current_view();
        if view.is_ranking() {
            self.load(view, true).await;
        }
    }

    async fn load(&self, view: View, refresh: bool) {
        match view {
            View::Faturamento => self.load_top_merchants(refresh).await,
            View::Cidades => self.load_top_cities(refresh).await,
            View::Categorias => self.load_top_categories(refresh).await,
            View::GerarDados => self.load_generate_data().await,
        }
    }

    // ========================================================================
    // LOADS
    // ========================================================================

    pub async fn load_top_merchants(&self, refresh: bool) {
        let ticket = self.begin(Update::new(Screen::Loading(LOADING.to_string())));
        let update = match self.api.top_merchants(refresh).await {
            Ok(data) => render::merchants(&data),
            Err(e) => render::load_error(&e),
        };
        self.finish(ticket, update);
    }

    pub async fn load_top_cities(&self, refresh: bool) {
        let ticket = self.begin(Update::new(Screen::Loading(LOADING.to_string())));
        let update = match self.api.top_cities(refresh).await {
            Ok(data) => render::cities(&data),
            Err(e) => render::load_error(&e),
        };
        self.finish(ticket, update);
    }

    pub async fn load_top_categories(&self, refresh: bool) {
        let ticket = self.begin(Update::new(Screen::Loading(LOADING.to_string())));
        let update = match self.api.top_categories(refresh).await {
            Ok(data) => render::categories(&data),
            Err(e) => render::load_error(&e),
        };
        self.finish(ticket, update);
    }

    pub async fn load_generate_data(&self) {
        let ticket =
            self.begin(Update::new(Screen::Loading(GENERATING.to_string())).with_refresh(false));
        let update = match self.api.generate_data().await {
            Ok(data) => render::generation(&data),
            Err(e) => render::generation_error(&e),
        };
        self.finish(ticket, update);
    }

    pub async fn load_legacy_top10(&self) {
        let ticket = self.begin(Update::new(Screen::Loading(LOADING.to_string())));
        let update = match self.api.legacy_top10().await {
            Ok(data) => render::legacy_merchants(&data),
            Err(e) => render::load_error(&e),
        };
        self.finish(ticket, update);
    }

    fn begin(&self, loading: Update) -> u64 {
        let mut state = self.lock();
        state.latest_ticket += 1;
        state.apply(&loading);
        state.latest_ticket
    }

    fn finish(&self, ticket: u64, update: Update) {
        let mut state = self.lock();
        if ticket != state.latest_ticket {
            debug!(
                ticket,
                latest = state.latest_ticket,
                "discarding response superseded by a newer load"
            );
            return;
        }
        state.apply(&update);
    }
}
