use poem_openapi::Object;

#[derive(Object)]
pub struct HealthDto {
    pub status: String,
    pub version: String,
}
