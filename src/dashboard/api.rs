// Endpoint contract consumed by the dashboard

use std::future::Future;
use thiserror::Error;

use crate::models::{
    GerarDadosResponse, LegacyTopResponse, TopCategoriasResponse, TopCidadesResponse,
    TopComerciosResponse,
};

/// API routes (shared by the HTTP client and the server router)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    TopMerchants,
    TopCities,
    TopCategories,
    GenerateData,
    LegacyTop10,
}

impl Endpoint {
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::TopMerchants => "/top10-faturamento",
            Endpoint::TopCities => "/top10-cidades",
            Endpoint::TopCategories => "/top10-categorias",
            Endpoint::GenerateData => "/gerar-dados",
            Endpoint::LegacyTop10 => "/top10",
        }
    }

    /// Ranking endpoints accept `?refresh=true`
    pub fn accepts_refresh(&self) -> bool {
        matches!(
            self,
            Endpoint::TopMerchants | Endpoint::TopCities | Endpoint::TopCategories
        )
    }

    pub fn path_and_query(&self, refresh: bool) -> String {
        if refresh && self.accepts_refresh() {
            format!("{}?refresh=true", self.path())
        } else {
            self.path().to_string()
        }
    }
}

/// Why a dashboard request failed; Display is the text shown to the user
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RequestError {
    /// Non-success HTTP status
    #[error("Erro na API: {status_text}")]
    Status { status: u16, status_text: String },

    /// Connection / transport failure, underlying message
    #[error("{0}")]
    Transport(String),

    /// Body was not the expected envelope
    #[error("resposta inválida da API: {0}")]
    Decode(String),
}

impl RequestError {
    pub fn status(status: u16, status_text: impl Into<String>) -> Self {
        RequestError::Status {
            status,
            status_text: status_text.into(),
        }
    }
}

/// One async call per endpoint the dashboard reads
pub trait DashboardApi: Send + Sync {
    fn top_merchants(
        &self,
        refresh: bool,
    ) -> impl Future<Output = Result<TopComerciosResponse, RequestError>> + Send;

    fn top_cities(
        &self,
        refresh: bool,
    ) -> impl Future<Output = Result<TopCidadesResponse, RequestError>> + Send;

    fn top_categories(
        &self,
        refresh: bool,
    ) -> impl Future<Output = Result<TopCategoriasResponse, RequestError>> + Send;

    fn generate_data(&self) -> impl Future<Output = Result<GerarDadosResponse, RequestError>> + Send;

    fn legacy_top10(&self) -> impl Future<Output = Result<LegacyTopResponse, RequestError>> + Send;
}
