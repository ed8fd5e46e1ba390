// Painel de Comércios - Core Library
// Exposes all modules for use in the CLI, the terminal dashboard, the API server and tests

pub mod analytics;
pub mod cache;
pub mod config;
pub mod dashboard;
pub mod format;
pub mod generator;
pub mod models;
pub mod service;
pub mod store;

#[cfg(feature = "server")]
pub mod server;

// Re-export commonly used types
pub use analytics::{top_categories, top_cities, top_merchants, RevenueTotal, TOP_N};
pub use cache::TtlCache;
pub use config::{Config, ConfigError};
pub use format::{format_brl, format_duration};
pub use generator::{generate_batch, generate_merchant, Porte, RAMOS_ATIVIDADE};
pub use models::{
    Amount, CategoriaFaturamento, CidadeFaturamento, Comercio, GerarDadosResponse,
    LegacyTopResponse, TopCategoriasResponse, TopCidadesResponse, TopComerciosResponse,
};
pub use service::{AnalyticsService, ServiceError};
pub use store::{MerchantStore, StoreError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
