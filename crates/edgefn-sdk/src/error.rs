//! Error types for edgefn function handlers

use thiserror::Error;

/// Errors a handler can surface instead of building the response by hand.
///
/// Each variant carries a fixed HTTP status; `From<HandlerError> for
/// Response` (and [`fallible`](crate::handler::fallible)) turn one into its
/// JSON error response.
#[derive(Error, Debug)]
pub enum HandlerError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Not found: {0}")]
    NotFoundMessage(String),

    #[error("Not found")]
    NotFound,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl HandlerError {
    /// The HTTP status this error answers with
    pub fn status_code(&self) -> u16 {
        match self {
            HandlerError::BadRequest(_) | HandlerError::Serialization(_) => 400,
            HandlerError::NotFound | HandlerError::NotFoundMessage(_) => 404,
            HandlerError::Internal(_) => 500,
        }
    }

    /// Render the error as its JSON error response
    pub fn to_response(&self) -> crate::Response {
        crate::Response::json(
            self.status_code(),
            serde_json::json!({
                "error": self.to_string()
            }),
        )
    }
}

impl From<HandlerError> for crate::Response {
    fn from(err: HandlerError) -> Self {
        err.to_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Response;

    #[test]
    fn test_status_codes() {
        assert_eq!(HandlerError::BadRequest("x".into()).status_code(), 400);
        assert_eq!(HandlerError::NotFound.status_code(), 404);
        assert_eq!(HandlerError::NotFoundMessage("x".into()).status_code(), 404);
        assert_eq!(HandlerError::Internal("x".into()).status_code(), 500);
    }

    #[test]
    fn test_serde_errors_map_to_bad_request() {
        let err: HandlerError = serde_json::from_str::<i64>("not json").unwrap_err().into();
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn test_handler_error_conversion() {
        let err = HandlerError::BadRequest("test error".to_string());
        let response: Response = err.into();
        assert_eq!(response.status, 400);
        assert!(response.body.unwrap().contains("test error"));
    }
}
