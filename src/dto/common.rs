//! Response bodies shared by several endpoints.

use serde::Serialize;
use utoipa::ToSchema;

/// Generic acknowledgement returned by endpoints without a payload.
#[derive(Debug, Serialize, ToSchema)]
pub struct ActionResponse {
    /// Always `true`; failures use the error body.
    pub success: bool,
    /// Human-readable outcome.
    pub message: String,
}

impl ActionResponse {
    /// Successful acknowledgement carrying `message`.
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}
