mod api;
mod auth;
mod config;
mod db;
mod error;
mod models;
mod recipes;
mod schema;
mod storage;
mod store;
mod telemetry;

use axum::extract::{FromRef, MatchedPath};
use axum::http::Request;
use axum::middleware;
use axum::Router;
use larder_core::{HttpRecipeParser, RecipeParser};
use std::env;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::Span;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::Config;
use crate::recipes::RecipeService;
use crate::storage::S3Storage;
use crate::store::PgRecipeStore;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub pool: Arc<db::DbPool>,
    pub recipes: RecipeService,
    pub parser: Arc<dyn RecipeParser>,
}

impl FromRef<AppState> for Arc<db::DbPool> {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}

impl FromRef<AppState> for RecipeService {
    fn from_ref(state: &AppState) -> Self {
        state.recipes.clone()
    }
}

impl FromRef<AppState> for Arc<dyn RecipeParser> {
    fn from_ref(state: &AppState) -> Self {
        state.parser.clone()
    }
}

#[tokio::main]
async fn main() {
    // Check for --openapi flag to dump spec and exit
    if env::args().any(|arg| arg == "--openapi") {
        let spec = api::openapi()
            .to_pretty_json()
            .expect("Failed to serialize OpenAPI spec");
        println!("{}", spec);
        return;
    }

    telemetry::init_telemetry();

    let config = Config::from_env();

    let pool = Arc::new(db::create_pool(&config.database_url));
    let storage = Arc::new(S3Storage::from_config(&config.s3).await);
    let store = Arc::new(PgRecipeStore::new(pool.clone()));
    let parser = HttpRecipeParser::new(&config.parser_url, config.parser_secret.clone())
        .expect("PARSER_URL must be an http(s) URL");

    let state = AppState {
        pool: pool.clone(),
        recipes: RecipeService::new(store, storage),
        parser: Arc::new(parser),
    };

    // Public routes (no auth required)
    let public_router = api::public::router();

    // Protected routes (auth required)
    let protected_router = Router::new()
        .nest("/api/test", api::testing::router())
        .nest("/api/recipes", api::recipes::router())
        .nest("/api/parse", api::parse::router())
        .nest("/api/taxonomy", api::taxonomy::router())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_auth,
        ));

    let swagger_ui = SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api::openapi());

    let app = Router::new()
        .merge(public_router)
        .merge(protected_router)
        .merge(swagger_ui)
        .with_state(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<_>| {
                    let matched_path = request
                        .extensions()
                        .get::<MatchedPath>()
                        .map(MatchedPath::as_str)
                        .unwrap_or(request.uri().path());

                    // Don't create a span at all for noisy endpoints
                    if matched_path == "/api/test/unauthed-ping" {
                        tracing::trace_span!("http_request")
                    } else {
                        tracing::info_span!(
                            "http_request",
                            method = %request.method(),
                            path = %matched_path,
                        )
                    }
                })
                .on_request(|_request: &Request<_>, _span: &Span| {})
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        // Skip logging for noisy endpoints (trace-level spans)
                        if span.metadata().map(|m| m.level()) == Some(&tracing::Level::TRACE) {
                            return;
                        }
                        let status = response.status().as_u16();
                        if status >= 500 {
                            tracing::error!(
                                status = %status,
                                latency_ms = %latency.as_millis(),
                                "request failed with server error"
                            );
                        } else {
                            tracing::info!(
                                status = %status,
                                latency_ms = %latency.as_millis(),
                                "request completed"
                            );
                        }
                    },
                )
                .on_failure(
                    |error: tower_http::classify::ServerErrorsFailureClass,
                     latency: std::time::Duration,
                     _span: &Span| {
                        tracing::error!(
                            error = %error,
                            latency_ms = %latency.as_millis(),
                            "request failed"
                        );
                    },
                ),
        );

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .expect("Failed to bind listen address");

    let local_addr = listener
        .local_addr()
        .expect("Failed to read listen address");
    tracing::info!("Server listening on {}", local_addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", local_addr);

    axum::serve(listener, app).await.expect("Server error");
}
