// error.rs
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MealError {
    #[error("meal service request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("could not decode meal payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("could not render page: {0}")]
    Template(#[from] askama::Error),

    #[error("invalid click target: {0:?}")]
    InvalidTarget(String),
}

impl IntoResponse for MealError {
    fn into_response(self) -> Response {
        let status = match self {
            MealError::Http(_) | MealError::Decode(_) => StatusCode::BAD_GATEWAY,
            MealError::Template(_) => StatusCode::INTERNAL_SERVER_ERROR,
            MealError::InvalidTarget(_) => StatusCode::BAD_REQUEST,
        };
        log::warn!("request failed: {}", self);
        (status, self.to_string()).into_response()
    }
}
