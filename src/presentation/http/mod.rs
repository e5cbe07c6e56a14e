use std::sync::Arc;

use poem::{Endpoint, EndpointExt, Route, middleware::Tracing, post};
use poem_openapi::OpenApiService;

use crate::presentation::http::endpoints::{
    root::{ApiState, Endpoints},
    webhook::receive,
};

pub mod endpoints;
pub mod responses;

/// `POST /` receives webhooks; `/api` carries the documented API with its
/// Swagger UI at `/docs`.
pub fn routes(state: Arc<ApiState>, server_url: String) -> impl Endpoint + 'static {
    let api_service = OpenApiService::new(Endpoints, "LINE OCR Hook", env!("CARGO_PKG_VERSION"))
        .server(format!("{}/api", server_url));
    let ui = api_service.swagger_ui();

    Route::new()
        .at("/", post(receive))
        .nest("/api", api_service)
        .nest("/docs", ui)
        .data(state)
        .with(Tracing)
}
