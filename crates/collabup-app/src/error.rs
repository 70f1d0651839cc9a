use collabup_core::error::CoreError;
use collabup_db::error::DbError;
use collabup_service::error::ServiceError;
use collabup_service::storage::PATH_DENIED_MESSAGE;
use salvo::http::StatusCode;
use salvo::writing::Json;
use salvo::{Depot, Request, Response, Writer, async_trait};
use serde::Serialize;
use thiserror::Error;

/// ## Summary
/// Error response payload
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    #[must_use]
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Application-level errors (HTTP layer)
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    ServiceError(#[from] ServiceError),

    #[error(transparent)]
    DatabaseError(#[from] DbError),

    #[error(transparent)]
    CoreError(#[from] CoreError),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

pub type AppResult<T> = std::result::Result<T, AppError>;

fn database_status(err: &DbError) -> (StatusCode, String) {
    match err {
        DbError::NotFound { .. } => (StatusCode::NOT_FOUND, "Not found".to_string()),
        DbError::InvalidDocument(message) => (StatusCode::BAD_REQUEST, message.clone()),
        _ => internal(),
    }
}

fn internal() -> (StatusCode, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "Internal server error".to_string(),
    )
}

impl AppError {
    /// ## Summary
    /// Maps the error onto the status code and the short message shown to the client.
    /// Details stay in the server log.
    #[must_use]
    pub fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            Self::ServiceError(err) => match err {
                ServiceError::NotAuthenticated | ServiceError::InvalidToken(_) => {
                    (StatusCode::UNAUTHORIZED, "Unauthorized".to_string())
                }
                ServiceError::AuthorizationError(message) if message == PATH_DENIED_MESSAGE => {
                    (StatusCode::FORBIDDEN, PATH_DENIED_MESSAGE.to_string())
                }
                ServiceError::AuthorizationError(_) => {
                    (StatusCode::FORBIDDEN, "Forbidden".to_string())
                }
                ServiceError::ValidationError(message) => (StatusCode::BAD_REQUEST, message.clone()),
                ServiceError::NotFound(_) => (StatusCode::NOT_FOUND, "Not found".to_string()),
                ServiceError::DatabaseError(db) => database_status(db),
                ServiceError::CoreError(CoreError::ValidationError(message)) => {
                    (StatusCode::BAD_REQUEST, message.clone())
                }
                _ => internal(),
            },
            Self::DatabaseError(db) => database_status(db),
            Self::CoreError(CoreError::ValidationError(message)) | Self::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, message.clone())
            }
            Self::CoreError(_) => internal(),
        }
    }
}

#[async_trait]
impl Writer for AppError {
    async fn write(self, req: &mut Request, _depot: &mut Depot, res: &mut Response) {
        let (status, message) = self.status_and_message();

        if status.is_server_error() {
            tracing::error!(
                error = ?self,
                method = %req.method(),
                path = %req.uri().path(),
                "Request failed"
            );
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "Request rejected");
        }

        res.status_code(status);
        res.render(Json(ErrorResponse::new(message)));
    }
}
