//! HTTP API Handlers and Routes
//!
//! The REST surface of Delve, built on the Axum web framework.
//!
//! # Module Structure
//!
//! - [`api::handlers`](crate::api::handlers) - Request handlers for each endpoint
//! - [`api::routes`](crate::api::routes) - Route definitions and router configuration
//!
//! # API Endpoints
//!
//! - `POST /research` - Run the research pipeline for `{"query": "..."}`
//! - `GET /health` - Health check endpoint
//! - `GET /openapi.json` - OpenAPI document for the endpoints above
//!
//! Errors share one body shape: `{"error": "...", "details": "..."}`, with
//! `details` omitted for validation failures.

use utoipa::OpenApi;

/// Request and response handlers for all API endpoints.
pub mod handlers;
/// Router configuration and route definitions.
pub mod routes;

/// OpenAPI document served at `/openapi.json`
#[derive(OpenApi)]
#[openapi(
    info(title = "Delve", description = "Question to cited research report"),
    paths(handlers::research::research, handlers::health::health),
    components(schemas(
        crate::types::ResearchRequest,
        crate::types::ResearchResponse,
        crate::types::ErrorResponse,
        crate::types::HealthResponse,
        crate::types::Report,
        crate::types::ReportSource,
    )),
    tags(
        (name = "research", description = "Research pipeline"),
        (name = "health", description = "Liveness")
    )
)]
pub struct ApiDoc;
