// HTTP server: JSON API + server-rendered dashboard page
//
// Routes:
//   GET /top10-faturamento   merchants ranking   (?refresh=true or X-Cache-Refresh: true)
//   GET /top10-cidades       cities ranking      (same refresh rules)
//   GET /top10-categorias    categories ranking  (same refresh rules)
//   GET /top10               legacy merchants ranking
//   GET /gerar-dados         append a generated batch
//   GET /                    dashboard page      (?view=<slug>&refresh=true)
//   GET /health              liveness
//   /static/*                static assets

use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::dashboard::{Action, Dashboard, DashboardApi, Endpoint, HtmlSurface, RequestError, View};
use crate::models::{
    GerarDadosResponse, LegacyTopResponse, TopCategoriasResponse, TopCidadesResponse,
    TopComerciosResponse,
};
use crate::service::{AnalyticsService, ServiceError};

pub const REFRESH_HEADER: &str = "x-cache-refresh";

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<AnalyticsService>,
}

impl AppState {
    pub fn new(service: AnalyticsService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error("tarefa interrompida: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// 500 with the error text as a plain-text body
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error!(error = %self, "request failed");
        (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
    }
}

/// Run file-bound service work on the blocking pool
async fn run_blocking<T, F>(service: Arc<AnalyticsService>, work: F) -> Result<T, ApiError>
where
    F: FnOnce(&AnalyticsService) -> Result<T, ServiceError> + Send + 'static,
    T: Send + 'static,
{
    let result = tokio::task::spawn_blocking(move || work(&service)).await?;
    Ok(result?)
}

// ============================================================================
// API Handlers
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct RefreshQuery {
    refresh: Option<String>,
}

fn wants_refresh(query: &RefreshQuery, headers: &HeaderMap) -> bool {
    let from_query = query.refresh.as_deref() == Some("true");
    let from_header = headers
        .get(REFRESH_HEADER)
        .and_then(|value| value.to_str().ok())
        == Some("true");
    from_query || from_header
}

/// GET /health - Health check
async fn health_check() -> &'static str {
    "OK"
}

/// GET /top10-faturamento - Top merchants by revenue
async fn top10_faturamento(
    State(state): State<AppState>,
    Query(query): Query<RefreshQuery>,
    headers: HeaderMap,
) -> Result<Json<TopComerciosResponse>, ApiError> {
    let refresh = wants_refresh(&query, &headers);
    let data = run_blocking(state.service, move |s| s.top_merchants(refresh)).await?;
    Ok(Json(data))
}

/// GET /top10-cidades - Revenue per city
async fn top10_cidades(
    State(state): State<AppState>,
    Query(query): Query<RefreshQuery>,
    headers: HeaderMap,
) -> Result<Json<TopCidadesResponse>, ApiError> {
    let refresh = wants_refresh(&query, &headers);
    let data = run_blocking(state.service, move |s| s.top_cities(refresh)).await?;
    Ok(Json(data))
}

/// GET /top10-categorias - Revenue per category
async fn top10_categorias(
    State(state): State<AppState>,
    Query(query): Query<RefreshQuery>,
    headers: HeaderMap,
) -> Result<Json<TopCategoriasResponse>, ApiError> {
    let refresh = wants_refresh(&query, &headers);
    let data = run_blocking(state.service, move |s| s.top_categories(refresh)).await?;
    Ok(Json(data))
}

/// GET /top10 - Legacy merchants ranking (uncached)
async fn top10_legacy(State(state): State<AppState>) -> Result<Json<LegacyTopResponse>, ApiError> {
    let data = run_blocking(state.service, |s| s.legacy_top10()).await?;
    Ok(Json(data))
}

/// GET /gerar-dados - Append a generated batch
async fn gerar_dados(State(state): State<AppState>) -> Result<Json<GerarDadosResponse>, ApiError> {
    let data = run_blocking(state.service, |s| s.generate()).await?;
    Ok(Json(data))
}

// ============================================================================
// Dashboard page
// ============================================================================

/// DashboardApi backed by the in-process service
///
/// Failures look like the HTTP API's: status 500.
#[derive(Clone)]
pub struct LocalApi {
    service: Arc<AnalyticsService>,
}

impl LocalApi {
    pub fn new(service: Arc<AnalyticsService>) -> Self {
        Self { service }
    }

    async fn call<T, F>(&self, work: F) -> Result<T, RequestError>
    where
        F: FnOnce(&AnalyticsService) -> Result<T, ServiceError> + Send + 'static,
        T: Send + 'static,
    {
        run_blocking(Arc::clone(&self.service), work)
            .await
            .map_err(|e| {
                warn!(error = %e, "dashboard load failed");
                RequestError::status(500, "Internal Server Error")
            })
    }
}

impl DashboardApi for LocalApi {
    async fn top_merchants(&self, refresh: bool) -> Result<TopComerciosResponse, RequestError> {
        self.call(move |s| s.top_merchants(refresh)).await
    }

    async fn top_cities(&self, refresh: bool) -> Result<TopCidadesResponse, RequestError> {
        self.call(move |s| s.top_cities(refresh)).await
    }

    async fn top_categories(&self, refresh: bool) -> Result<TopCategoriasResponse, RequestError> {
        self.call(move |s| s.top_categories(refresh)).await
    }

    async fn generate_data(&self) -> Result<GerarDadosResponse, RequestError> {
        self.call(|s| s.generate()).await
    }

    async fn legacy_top10(&self) -> Result<LegacyTopResponse, RequestError> {
        self.call(|s| s.legacy_top10()).await
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    view: Option<String>,
    refresh: Option<String>,
}

/// GET / - Dashboard page; the view travels in the URL
async fn dashboard_page(State(state): State<AppState>, Query(query): Query<PageQuery>) -> Html<String> {
    let view = query.view.as_deref().and_then(View::from_slug);
    let refresh = query.refresh.as_deref() == Some("true");

    let dashboard = Dashboard::with_view(
        LocalApi::new(state.service),
        HtmlSurface::default(),
        view.unwrap_or_default(),
    );

    let action = match view {
        None => Action::Initialize,
        Some(view) if refresh && view.is_ranking() => Action::Refresh,
        Some(view) => Action::Navigate(view),
    };
    dashboard.dispatch(action).await;

    let current = dashboard.current_view();
    Html(dashboard.into_surface().page(current))
}

// ============================================================================
// Router
// ============================================================================

pub fn router(state: AppState, static_dir: &Path) -> Router {
    Router::new()
        .route("/", get(dashboard_page))
        .route("/health", get(health_check))
        .route(Endpoint::TopMerchants.path(), get(top10_faturamento))
        .route(Endpoint::TopCities.path(), get(top10_cidades))
        .route(Endpoint::TopCategories.path(), get(top10_categorias))
        .route(Endpoint::LegacyTop10.path(), get(top10_legacy))
        .route(Endpoint::GenerateData.path(), get(gerar_dados))
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Comercio;
    use crate::service::tests::{comercio, service_with};
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use serde_json::Value;
    use tempfile::TempDir;
    use tower::ServiceExt;

    /// Router over a temp data file; keep the guard alive for the test
    fn app(comercios: &[Comercio]) -> (TempDir, Router) {
        let (dir, service) = service_with(comercios, 4);
        (dir, router(AppState::new(service), Path::new("web/static")))
    }

    fn sample() -> Vec<Comercio> {
        vec![
            comercio(1, "Cidade 1", "Varejo", 1000.0),
            comercio(2, "Cidade 2", "Saúde", 5000.0),
            comercio(3, "Cidade 1", "Varejo", 3000.0),
        ]
    }

    async fn get_response(app: &Router, uri: &str, refresh_header: bool) -> (StatusCode, String) {
        let mut request = Request::builder().uri(uri);
        if refresh_header {
            request = request.header("X-Cache-Refresh", "true");
        }
        let response = app
            .clone()
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    async fn get_json(app: &Router, uri: &str, refresh_header: bool) -> Value {
        let (status, body) = get_response(app, uri, refresh_header).await;
        assert_eq!(status, StatusCode::OK, "body: {}", body);
        serde_json::from_str(&body).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let (_dir, app) = app(&sample());
        assert_eq!(get_response(&app, "/health", false).await, (StatusCode::OK, "OK".to_string()));

        let (status, css) = get_response(&app, "/static/style.css", false).await;
        assert_eq!(status, StatusCode::OK);
        assert!(css.contains("#dashboard"));
    }

    #[tokio::test]
    async fn test_rankings_cache_and_refresh() {
        let (_dir, app) = app(&sample());

        let first = get_json(&app, "/top10-cidades", false).await;
        assert_eq!(first["fonte_dados"], "Processamento ao Vivo");
        assert_eq!(first["top_10_cidades"][0]["cidade"], "Cidade 2");
        assert_eq!(first["top_10_cidades"][0]["faturamento"], 5000.0);
        assert_eq!(first["top_10_cidades"][1]["faturamento"], 4000.0);

        let cached = get_json(&app, "/top10-cidades", false).await;
        assert_eq!(cached["fonte_dados"], "Cache");

        let by_query = get_json(&app, "/top10-cidades?refresh=true", false).await;
        assert_eq!(by_query["fonte_dados"], "Processamento ao Vivo");

        let by_header = get_json(&app, "/top10-cidades", true).await;
        assert_eq!(by_header["fonte_dados"], "Processamento ao Vivo");

        let merchants = get_json(&app, "/top10-faturamento", false).await;
        let ids: Vec<u64> = merchants["top_10_comercios"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["id_comercio"].as_u64().unwrap())
            .collect();
        assert_eq!(ids, vec![2, 3, 1]);

        let categories = get_json(&app, "/top10-categorias", false).await;
        assert_eq!(categories["top_10_categorias"][0]["categoria"], "Saúde");
    }

    #[tokio::test]
    async fn test_legacy_envelope_has_no_source() {
        let (_dir, app) = app(&sample());
        let legacy = get_json(&app, "/top10", false).await;

        assert_eq!(legacy["top_10_comercios"].as_array().unwrap().len(), 3);
        assert!(legacy.get("fonte_dados").is_none());
        assert!(legacy["tempo_processamento"].is_string());
    }

    #[tokio::test]
    async fn test_generate_data() {
        let (_dir, app) = app(&sample());
        let result = get_json(&app, "/gerar-dados", false).await;

        assert_eq!(result["mensagem"], "4 novos registros adicionados com sucesso!");
        assert_eq!(result["registros_gerados"], 7);
    }

    #[tokio::test]
    async fn test_missing_data_file_is_500() {
        let (_dir, app) = app(&[]);
        let (status, body) = get_response(&app, "/top10-faturamento", false).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body.contains("não encontrado"));
    }

    #[tokio::test]
    async fn test_page_default_view_renders_merchants() {
        let (_dir, app) = app(&sample());
        let (status, page) = get_response(&app, "/", false).await;

        assert_eq!(status, StatusCode::OK);
        assert!(page.contains("<h2>Top 10 Empresas por Faturamento</h2>"));
        assert_eq!(page.matches("<tr><td>").count(), 3);
        assert!(page.contains("R$\u{a0}5.000,00"));
        assert!(page.contains("href=\"/?view=faturamento&amp;refresh=true\" style=\"display: block;\""));
    }

    #[tokio::test]
    async fn test_page_refresh_of_cities() {
        let (_dir, app) = app(&sample());
        let (_, page) = get_response(&app, "/?view=cidades&refresh=true", false).await;

        assert!(page.contains("<h2>Top 10 Cidades por Faturamento</h2>"));
        assert!(page.contains("Fonte: Processamento ao Vivo"));
        assert!(page.contains("id=\"top10-cidades\" class=\"active\""));
    }

    #[tokio::test]
    async fn test_page_generation_hides_refresh() {
        let (_dir, app) = app(&sample());
        let (_, page) = get_response(&app, "/?view=gerar-dados", false).await;

        assert!(page.contains("<h2>Dados Gerados com Sucesso!</h2>"));
        assert!(page.contains("<strong>Registros Gerados:</strong> 7"));
        assert!(page.contains("style=\"display: none;\""));
    }

    #[tokio::test]
    async fn test_page_shows_inline_error_without_table() {
        let (_dir, app) = app(&[]);
        let (status, page) = get_response(&app, "/?view=categorias", false).await;

        assert_eq!(status, StatusCode::OK);
        assert!(page.contains(
            "Erro ao carregar os dados: Erro na API: Internal Server Error"
        ));
        assert!(!page.contains("<table"));
    }

    #[cfg(feature = "client")]
    #[tokio::test]
    async fn test_http_dashboard_against_live_server() {
        use crate::dashboard::{HttpApi, Screen, ScreenBuffer};

        let (_dir, app) = app(&sample());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let dashboard = Dashboard::new(HttpApi::new(format!("http://{}", addr)), ScreenBuffer::default());
        dashboard.navigate(View::Cidades).await;
        dashboard.refresh().await;

        dashboard.read_surface(|s| {
            assert!(s.refresh_visible);
            match &s.screen {
                Screen::Table(table) => {
                    assert_eq!(table.rows[0], vec!["Cidade 2", "R$\u{a0}5.000,00"]);
                    assert!(table.caption.starts_with("Fonte: Processamento ao Vivo"));
                }
                other => panic!("unexpected screen {:?}", other),
            }
        });
    }
}
