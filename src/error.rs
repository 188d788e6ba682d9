use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use anyhow::Error as ANYHOW_ERROR;
use bigdecimal::ParseBigDecimalError as BIG_DECIMAL_ERROR;
use reqwest::Error as REQWEST_ERROR;
use serde::Serialize;
use serde_json::Error as JSON_ERROR;
use std::{
    env::VarError, io::Error as IO_ERROR, num::ParseIntError,
    num::TryFromIntError as TRY_FROM_INT_ERROR,
};
use thiserror::Error;
use tokio::task::JoinError;
use tracing::subscriber::SetGlobalDefaultError as TRACING_GLOBAL_DEFAULT_ERROR;
use url::ParseError as URL_ERROR;

/// Typed reason an upstream adapter failed. A failed adapter is data for the
/// derivation fallback chain, not an error that aborts the refresh.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    #[error("upstream unavailable")]
    UpstreamUnavailable,

    #[error("upstream response malformed")]
    UpstreamMalformed,
}

/// An adapter either fully succeeds with a normalized payload or fully fails
/// with a typed reason. Never partially constructed.
pub type UpstreamResult<T> = Result<T, FailureKind>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Io(#[from] IO_ERROR),

    #[error("{0}")]
    URL(#[from] URL_ERROR),

    #[error("{0}")]
    INT(#[from] ParseIntError),

    #[error("{0}")]
    VAR(#[from] VarError),

    #[error("{0}")]
    TokioJoinError(#[from] JoinError),

    #[error("{0}")]
    Reqwest(#[from] REQWEST_ERROR),

    #[error("{0}")]
    JsonError(#[from] JSON_ERROR),

    #[error("{0}")]
    BigDecimalError(#[from] BIG_DECIMAL_ERROR),

    #[error("{0}")]
    TryFromIntError(#[from] TRY_FROM_INT_ERROR),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("No upstream source yielded a usable floor price")]
    NoResolvableFloorPrice,

    #[error("Server end with error: {0}")]
    ServerError(String),

    #[error("Tracing error: {0}")]
    SetGlobalDefaultError(#[from] TRACING_GLOBAL_DEFAULT_ERROR),

    #[error("{0}")]
    AnyHowError(#[from] ANYHOW_ERROR),
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorBody {
            message: self.to_string(),
        })
    }
}
