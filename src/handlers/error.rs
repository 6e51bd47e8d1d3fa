//! HTTP rendering of [`CmsError`]

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::{debug, error, warn};

use crate::utils::errors::{CmsError, ErrorSeverity};

impl CmsError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            CmsError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            CmsError::NotFound { .. } => StatusCode::NOT_FOUND,
            CmsError::Authentication(_) => StatusCode::UNAUTHORIZED,
            CmsError::PermissionDenied(_) => StatusCode::FORBIDDEN,
            CmsError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for CmsError {
    fn into_response(self) -> Response {
        match self.severity() {
            ErrorSeverity::Critical | ErrorSeverity::Error => error!(error = %self, "Request failed"),
            ErrorSeverity::Warning => warn!(error = %self, "Request rejected"),
            ErrorSeverity::Info => debug!(error = %self, "Request rejected"),
        }

        let status = self.status_code();
        let body = match self {
            CmsError::Validation(errors) => json!({ "errors": errors }),
            CmsError::NotFound { .. } => json!({ "detail": "Not found." }),
            CmsError::Authentication(_) => {
                json!({ "detail": "Authentication credentials were not provided." })
            }
            CmsError::PermissionDenied(message) | CmsError::InvalidInput(message) => {
                json!({ "detail": message })
            }
            _ => json!({ "detail": "Internal server error." }),
        };

        (status, Json(body)).into_response()
    }
}
