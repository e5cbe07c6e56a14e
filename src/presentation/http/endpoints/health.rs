use poem_openapi::{OpenApi, payload::Json};

use crate::presentation::http::{
    endpoints::root::{Endpoints, EndpointsTags},
    responses::HealthDto,
};

#[OpenApi]
impl Endpoints {
    #[oai(path = "/health", method = "get", tag = EndpointsTags::Health)]
    pub async fn health(&self) -> Json<HealthDto> {
        Json(HealthDto {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        })
    }
}
