use axum::{response::IntoResponse, Json};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UnauthedPingResponse {
    pub message: String,
}

#[utoipa::path(
    get,
    path = "/api/test/unauthed-ping",
    tag = "testing",
    responses(
        (status = 200, description = "Liveness check", body = UnauthedPingResponse)
    )
)]
pub async fn unauthed_ping() -> impl IntoResponse {
    Json(UnauthedPingResponse {
        message: "unauthed-ping".to_string(),
    })
}
