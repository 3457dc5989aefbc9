//! The Grooming Spot Quote Service
//!
//! Receives appointment requests from the booking form and emails them, with
//! any uploaded documents, to the salon.

use axum::{extract::DefaultBodyLimit, routing::get, Router};
use grooming_utils::AppConfig;
use std::{sync::Arc, time::Duration};
use tower::ServiceBuilder;
use tower_http::{limit::RequestBodyLimitLayer, timeout::TimeoutLayer, trace::TraceLayer};

pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod service;
pub mod smtp_client;
pub mod submission;
pub mod template_engine;

use handlers::health_check;
use middleware::request_id_middleware;
pub use service::QuoteService;
pub use smtp_client::{MailTransport, SmtpClient};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub quote_service: QuoteService,
}

impl AppState {
    pub fn new(config: AppConfig, mailer: Arc<dyn MailTransport>) -> Self {
        let quote_service = QuoteService::new(config.email.clone(), mailer);
        Self {
            config: Arc::new(config),
            quote_service,
        }
    }
}

pub fn create_app(state: AppState) -> Router {
    let max_request_size = state.config.server.max_request_size;
    let timeout = Duration::from_secs(state.config.server.timeout_seconds);

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", routes::create_api_routes())
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http())
                .layer(DefaultBodyLimit::disable())
                .layer(RequestBodyLimitLayer::new(max_request_size))
                .layer(TimeoutLayer::new(timeout)),
        )
        .with_state(state)
}
