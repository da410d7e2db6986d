use crate::render::RenderError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("password confirmation doesn't match password")]
    PasswordConfirmationMismatch,
    #[error("invalid account")]
    InvalidAccount,
    #[error("provider not found: {0}")]
    ProviderNotFound(String),
    #[error("failed to read request body")]
    Body(#[source] axum::Error),
    #[error("invalid form: {0}")]
    InvalidForm(String),
    #[error("invalid identity table name: {0}")]
    InvalidIdentityModel(String),
    #[error(transparent)]
    Render(#[from] RenderError),
}

impl Error {
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::PasswordConfirmationMismatch | Self::InvalidAccount => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            Self::ProviderNotFound(_) => StatusCode::NOT_FOUND,
            Self::Body(_) | Self::InvalidForm(_) => StatusCode::BAD_REQUEST,
            Self::InvalidIdentityModel(_) | Self::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("{:?}", self);
            return (status, "Internal server error".to_string()).into_response();
        }
        (status, self.to_string()).into_response()
    }
}
