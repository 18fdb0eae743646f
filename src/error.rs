use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse},
};
use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;
use tracing::error;

#[derive(Debug, ThisError)]
pub enum ReceiptError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Receipt {0} not found")]
    NotFound(i64),

    #[error("Organization profile is already configured")]
    AlreadyConfigured,

    #[error("Database error: {0}")]
    Database(#[from] SqlxError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("PDF render error: {0}")]
    Pdf(String),

    #[error("Template error: {0}")]
    Template(#[from] askama::Error),
}

impl ReceiptError {
    pub fn missing_field(name: &str) -> Self {
        ReceiptError::Validation(format!("`{name}` is required"))
    }

    /// Status code and the message shown to the user.
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            ReceiptError::Validation(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg.clone()),
            ReceiptError::NotFound(_) => (StatusCode::NOT_FOUND, "Receipt not found.".to_string()),
            ReceiptError::AlreadyConfigured => (
                StatusCode::CONFLICT,
                "The organization profile has already been set up.".to_string(),
            ),
            ReceiptError::Database(_)
            | ReceiptError::Io(_)
            | ReceiptError::Json(_)
            | ReceiptError::Pdf(_)
            | ReceiptError::Template(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An internal server error occurred.".to_string(),
            ),
        }
    }
}

#[derive(Template)]
#[template(path = "error.html")]
struct ErrorPage<'a> {
    code: u16,
    reason: &'a str,
    message: &'a str,
}

impl IntoResponse for ReceiptError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = self.status_and_message();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }

        let page = ErrorPage {
            code: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("Error"),
            message: &message,
        };
        match page.render() {
            Ok(body) => (status, Html(body)).into_response(),
            Err(_) => (status, message).into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn internal_errors_hide_details() {
        let err = ReceiptError::Pdf("font table exploded".to_string());
        let (status, message) = err.status_and_message();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!message.contains("font table"));
    }

    #[test]
    fn client_errors_map_to_4xx() {
        assert_eq!(
            ReceiptError::NotFound(7).status_and_message().0,
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ReceiptError::AlreadyConfigured.status_and_message().0,
            StatusCode::CONFLICT
        );
        let (status, message) = ReceiptError::missing_field("patient_name").status_and_message();
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(message.contains("patient_name"));
    }
}
