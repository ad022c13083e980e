// Vehicle Registration Dashboard - Web Server
// JSON API over the same dashboard core the terminal UI uses

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use vehicle_dashboard::{
    init_tracing, open_dashboard, Dashboard, DashboardConfig, DashboardOptions, DashboardView,
    DatasetCache, DateRange, FilterSelection,
};

/// Shared application state. The dataset inside is immutable, so handlers
/// read it concurrently without locking.
#[derive(Clone)]
struct AppState {
    dashboard: Arc<Dashboard>,
}

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

/// Query string for /api/dashboard.
///
/// An absent `categories`/`manufacturers` parameter means "all"; a present
/// but empty one (`categories=`) is an explicit empty selection.
#[derive(Debug, Default, Deserialize)]
struct DashboardQuery {
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    categories: Option<String>,
    manufacturers: Option<String>,
    #[serde(default)]
    raw: bool,
}

impl DashboardQuery {
    fn into_selection(self, defaults: FilterSelection) -> FilterSelection {
        FilterSelection::new(
            DateRange::new(
                self.start.unwrap_or(defaults.date_range.start),
                self.end.unwrap_or(defaults.date_range.end),
            ),
            match self.categories {
                Some(list) => split_list(&list),
                None => defaults.categories.into_iter().collect(),
            },
            match self.manufacturers {
                Some(list) => split_list(&list),
                None => defaults.manufacturers.into_iter().collect(),
            },
        )
        .with_raw(self.raw)
    }
}

fn split_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /api/options - Widget choices (categories, manufacturers, date bounds)
async fn get_options(State(state): State<AppState>) -> Json<ApiResponse<DashboardOptions>> {
    Json(ApiResponse::ok(state.dashboard.options()))
}

/// GET /api/dashboard - Metrics and chart tables for a selection
/// An inverted date range is not an error, it selects nothing.
async fn get_dashboard(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> Json<ApiResponse<DashboardView>> {
    let selection = query.into_selection(state.dashboard.default_selection());
    Json(ApiResponse::ok(state.dashboard.view(&selection)))
}

fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/options", get(get_options))
        .route("/dashboard", get(get_dashboard))
        .with_state(state);

    Router::new()
        .nest("/api", api_routes)
        .layer(CorsLayer::permissive())
}

// ============================================================================
// Main Server
// ============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    tracing::info!("Vehicle Registration Dashboard server v{}", vehicle_dashboard::VERSION);

    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = DashboardConfig::load(config_path.as_deref())?;

    // The composition root owns the cache; startup fails if no data
    let cache = DatasetCache::new();
    let dashboard = open_dashboard(&config, &cache)?;
    tracing::info!(rows = dashboard.dataset().len(), "dataset ready");

    let state = AppState {
        dashboard: Arc::new(dashboard),
    };
    let app = build_router(state);

    let addr = "0.0.0.0:3000";
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("Server running on http://localhost:3000");
    tracing::info!("   API: http://localhost:3000/api/dashboard");

    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use vehicle_dashboard::{Dataset, RegistrationRecord};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn defaults() -> FilterSelection {
        let dataset = Dataset::new(vec![
            RegistrationRecord::new(date(2022, 1, 31), "2W", "Hero", 1000),
            RegistrationRecord::new(date(2023, 1, 31), "4W", "Tata", 1100),
        ]);
        FilterSelection::everything(&dataset).unwrap()
    }

    #[test]
    fn test_absent_params_select_everything() {
        let selection = DashboardQuery::default().into_selection(defaults());

        assert_eq!(selection, defaults());
    }

    #[test]
    fn test_empty_param_is_explicit_empty_selection() {
        let query = DashboardQuery {
            manufacturers: Some(String::new()),
            ..Default::default()
        };
        let selection = query.into_selection(defaults());

        assert!(selection.manufacturers.is_empty());
        assert_eq!(selection.categories.len(), 2);
    }

    #[test]
    fn test_list_params_are_trimmed() {
        let query = DashboardQuery {
            categories: Some(" 2W, 4W ,".to_string()),
            start: Some(date(2023, 1, 1)),
            raw: true,
            ..Default::default()
        };
        let selection = query.into_selection(defaults());

        assert_eq!(selection.categories.len(), 2);
        assert!(selection.categories.contains("4W"));
        assert_eq!(selection.date_range.start, date(2023, 1, 1));
        assert!(selection.show_raw);
    }

    #[tokio::test]
    async fn test_inverted_range_returns_empty_view() {
        let dataset = Dataset::new(vec![
            RegistrationRecord::new(date(2022, 1, 31), "2W", "Hero", 1000),
            RegistrationRecord::new(date(2023, 1, 31), "4W", "Tata", 1100),
        ]);
        let state = AppState {
            dashboard: Arc::new(Dashboard::new(Arc::new(dataset))),
        };
        let query = DashboardQuery {
            start: Some(date(2023, 12, 31)),
            end: Some(date(2022, 1, 1)),
            ..Default::default()
        };

        let Json(response) = get_dashboard(State(state), Query(query)).await;

        assert!(response.success);
        let view = response.data.unwrap();
        assert_eq!(view.row_count, 0);
        assert!(view.market_share.is_empty());
    }
}
