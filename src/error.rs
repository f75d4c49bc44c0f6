use actix_web::{
    error::QueryPayloadError, http::StatusCode, HttpRequest, HttpResponse, ResponseError,
};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum Error {
    InvalidGeometry(String),
    Validation(String),
    NotFound(String),
    Conflict(String),
    // A zone was written after its drawing session had been cancelled
    ReconciliationRequired(i64),
    GeocodeNotFound(String),
    GeocodeService(String),
    IO(std::io::Error),
    Rusqlite(rusqlite::Error),
    Reqwest(reqwest::Error),
    SerdeJson(serde_json::Error),
    TimeFormat(time::error::Format),
    DeadpoolPool(deadpool_sqlite::PoolError),
    DeadpoolInteract(deadpool_sqlite::InteractError),
    DeadpoolConfig(deadpool_sqlite::ConfigError),
    DeadpoolBuild(deadpool_sqlite::BuildError),
    CLI(String),
    Generic(String),
}

impl Error {
    /// Transient storage failures. Reads and updates are safe to retry,
    /// creates are not unless the caller de-duplicates.
    pub fn is_persistence_unavailable(&self) -> bool {
        matches!(
            self,
            Error::IO(_)
                | Error::Rusqlite(_)
                | Error::DeadpoolPool(_)
                | Error::DeadpoolInteract(_)
                | Error::DeadpoolConfig(_)
                | Error::DeadpoolBuild(_)
        )
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Error::InvalidGeometry(_) => "invalid_geometry",
            Error::Validation(_) => "validation",
            Error::NotFound(_) => "not_found",
            Error::Conflict(_) => "conflict",
            Error::ReconciliationRequired(_) => "reconciliation_required",
            Error::GeocodeNotFound(_) => "geocode_not_found",
            Error::GeocodeService(_) => "geocode_service",
            _ if self.is_persistence_unavailable() => "persistence_unavailable",
            _ => "internal",
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InvalidGeometry(err) => write!(f, "Invalid geometry: {}", err),
            Error::Validation(err) => write!(f, "{}", err),
            Error::NotFound(err) => write!(f, "{}", err),
            Error::Conflict(err) => write!(f, "{}", err),
            Error::ReconciliationRequired(zone_id) => write!(
                f,
                "Zone {} was saved after the drawing was cancelled and may need to be removed",
                zone_id
            ),
            Error::GeocodeNotFound(address) => write!(
                f,
                "Address not found: {}. Check the address or set the coordinates manually",
                address
            ),
            Error::GeocodeService(err) => write!(
                f,
                "Geocoding service failed: {}. Try again later or set the coordinates manually",
                err
            ),
            Error::IO(err) => err.fmt(f),
            Error::Rusqlite(err) => err.fmt(f),
            Error::Reqwest(err) => err.fmt(f),
            Error::SerdeJson(err) => err.fmt(f),
            Error::TimeFormat(err) => err.fmt(f),
            Error::DeadpoolPool(err) => err.fmt(f),
            Error::DeadpoolInteract(err) => err.fmt(f),
            Error::DeadpoolConfig(err) => err.fmt(f),
            Error::DeadpoolBuild(err) => err.fmt(f),
            Error::CLI(err) => write!(f, "{}", err),
            Error::Generic(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for Error {}

impl From<&str> for Error {
    fn from(str: &str) -> Self {
        Error::Generic(str.to_owned())
    }
}

impl From<String> for Error {
    fn from(str: String) -> Self {
        Error::Generic(str)
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Error::IO(error)
    }
}

impl From<rusqlite::Error> for Error {
    fn from(error: rusqlite::Error) -> Self {
        Error::Rusqlite(error)
    }
}

impl From<reqwest::Error> for Error {
    fn from(error: reqwest::Error) -> Self {
        Error::Reqwest(error)
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Error::SerdeJson(error)
    }
}

impl From<time::error::Format> for Error {
    fn from(error: time::error::Format) -> Self {
        Error::TimeFormat(error)
    }
}

impl From<deadpool_sqlite::PoolError> for Error {
    fn from(error: deadpool_sqlite::PoolError) -> Self {
        Error::DeadpoolPool(error)
    }
}

impl From<deadpool_sqlite::InteractError> for Error {
    fn from(error: deadpool_sqlite::InteractError) -> Self {
        Error::DeadpoolInteract(error)
    }
}

impl From<deadpool_sqlite::ConfigError> for Error {
    fn from(error: deadpool_sqlite::ConfigError) -> Self {
        Error::DeadpoolConfig(error)
    }
}

impl From<deadpool_sqlite::BuildError> for Error {
    fn from(error: deadpool_sqlite::BuildError) -> Self {
        Error::DeadpoolBuild(error)
    }
}

pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    Error::Validation(format!("Invalid arguments: {err}")).into()
}

#[derive(Serialize, Deserialize)]
pub struct ApiError {
    pub http_code: u16,
    pub kind: String,
    pub message: String,
}

impl ResponseError for Error {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ApiError {
            http_code: self.status_code().as_u16(),
            kind: self.kind().into(),
            message: self.to_string(),
        })
    }

    fn status_code(&self) -> StatusCode {
        match self {
            Error::InvalidGeometry(_) | Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Conflict(_) | Error::ReconciliationRequired(_) => StatusCode::CONFLICT,
            Error::GeocodeNotFound(_) => StatusCode::NOT_FOUND,
            Error::GeocodeService(_) => StatusCode::BAD_GATEWAY,
            _ if self.is_persistence_unavailable() => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[cfg(test)]
mod test {
    use super::Error;
    use actix_web::{http::StatusCode, ResponseError};

    #[test]
    fn status_codes() {
        assert_eq!(
            StatusCode::BAD_REQUEST,
            Error::InvalidGeometry("".into()).status_code()
        );
        assert_eq!(
            StatusCode::NOT_FOUND,
            Error::NotFound("".into()).status_code()
        );
        assert_eq!(
            StatusCode::SERVICE_UNAVAILABLE,
            Error::Rusqlite(rusqlite::Error::InvalidQuery).status_code()
        );
    }

    #[test]
    fn persistence_unavailable() {
        assert!(Error::Rusqlite(rusqlite::Error::InvalidQuery).is_persistence_unavailable());
        assert!(!Error::NotFound("".into()).is_persistence_unavailable());
        assert_eq!(
            "persistence_unavailable",
            Error::Rusqlite(rusqlite::Error::InvalidQuery).kind()
        );
    }
}
