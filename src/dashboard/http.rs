// DashboardApi over HTTP (reqwest)

use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::models::{
    GerarDadosResponse, LegacyTopResponse, TopCategoriasResponse, TopCidadesResponse,
    TopComerciosResponse,
};

use super::api::{DashboardApi, Endpoint, RequestError};

/// Talks to a running painel server, e.g. `http://localhost:8080`
#[derive(Debug, Clone)]
pub struct HttpApi {
    client: Client,
    base_url: String,
}

impl HttpApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn url(&self, endpoint: Endpoint, refresh: bool) -> String {
        format!("{}{}", self.base_url, endpoint.path_and_query(refresh))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        refresh: bool,
    ) -> Result<T, RequestError> {
        let response = self
            .client
            .get(self.url(endpoint, refresh))
            .send()
            .await
            .map_err(|e| RequestError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            // Unregistered codes have no reason phrase; show the number instead
            let status_text = status
                .canonical_reason()
                .map(str::to_string)
                .unwrap_or_else(|| status.as_str().to_string());
            return Err(RequestError::status(status.as_u16(), status_text));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| RequestError::Decode(e.to_string()))
    }
}

impl DashboardApi for HttpApi {
    async fn top_merchants(&self, refresh: bool) -> Result<TopComerciosResponse, RequestError> {
        self.get_json(Endpoint::TopMerchants, refresh).await
    }

    async fn top_cities(&self, refresh: bool) -> Result<TopCidadesResponse, RequestError> {
        self.get_json(Endpoint::TopCities, refresh).await
    }

    async fn top_categories(&self, refresh: bool) -> Result<TopCategoriasResponse, RequestError> {
        self.get_json(Endpoint::TopCategories, refresh).await
    }

    async fn generate_data(&self) -> Result<GerarDadosResponse, RequestError> {
        self.get_json(Endpoint::GenerateData, false).await
    }

    async fn legacy_top10(&self) -> Result<LegacyTopResponse, RequestError> {
        self.get_json(Endpoint::LegacyTop10, false).await
    }
}
