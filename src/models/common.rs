use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Error body every endpoint returns under `{"success": false, "error": ...}`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}
