// src/error.rs
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use crate::views;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Question {0} does not exist")]
    MissingQuestion(i64),

    #[error("Choice {0} cannot take another vote")]
    VoteOverflow(i64),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    NotFound(&'static str),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Template error: {0}")]
    Render(#[from] askama::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::NotFound(message) => error_page(StatusCode::NOT_FOUND, views::not_found(message), message),
            AppError::Store(e) => {
                error!("Request failed: {e}");
                server_error()
            }
            AppError::Render(e) => {
                error!("Failed to render page: {e}");
                server_error()
            }
        }
    }
}

fn server_error() -> Response {
    error_page(StatusCode::INTERNAL_SERVER_ERROR, views::server_error(), "Server Error (500)")
}

/// Falls back to a plain-text body if the page itself fails to render.
fn error_page(status: StatusCode, page: askama::Result<String>, fallback: &'static str) -> Response {
    match page {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => {
            error!("Failed to render error page: {e}");
            (status, fallback).into_response()
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid {key} value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Error, Debug)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to connect to the database: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Failed to run migrations: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),
}
