use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use std::borrow::Cow;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Bad Request: {0}")]
    BadRequest(Cow<'static, str>),
    #[error("Not Found: {0}")]
    NotFound(Cow<'static, str>),
    #[error("Payload Too Large: {0}")]
    PayloadTooLarge(Cow<'static, str>),
    #[error("Service Unavailable: {0}")]
    ServiceUnavailable(Cow<'static, str>),
    #[error("Upstream Failure: {0}")]
    Upstream(Cow<'static, str>),
    #[error("Internal Server Error")]
    InternalServer,
}

#[derive(serde::Serialize, serde::Deserialize, Debug)]
pub struct ErrorBody {
    pub error: Cow<'static, str>,
}

impl Error {
    pub fn bad_request(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn not_found(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn payload_too_large(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::PayloadTooLarge(msg.into())
    }

    pub fn upstream(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::Upstream(msg.into())
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match *self {
            Error::BadRequest(_) => StatusCode::BAD_REQUEST,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Error::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Error::Upstream(_) | Error::InternalServer => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut res = HttpResponse::build(self.status_code());

        match self {
            // Has Message
            Error::BadRequest(msg)
            | Error::NotFound(msg)
            | Error::PayloadTooLarge(msg)
            | Error::ServiceUnavailable(msg)
            | Error::Upstream(msg) => res.json(ErrorBody { error: msg.clone() }),
            // No Message
            Error::InternalServer => res.json(ErrorBody { error: "Internal Server Error".into() }),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum SystemError {
    #[error("I/O Error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON Serialization/Deserialization Error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("HTTP Client Error: {0}")]
    HttpError(#[from] reqwest::Error),
    // Custom Errors
    #[error("Bad Request: {0}")]
    BadRequest(Cow<'static, str>),
    #[error("Not Found: {0}")]
    NotFound(Cow<'static, str>),
    #[error("Payload Too Large: {0}")]
    PayloadTooLarge(Cow<'static, str>),
    #[error("AI Disabled: {0}")]
    AiDisabled(Cow<'static, str>),
    #[error("Upstream AI Error: {0}")]
    Upstream(Cow<'static, str>),
}

impl SystemError {
    pub fn bad_request(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn not_found(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn payload_too_large(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::PayloadTooLarge(msg.into())
    }

    pub fn ai_disabled(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::AiDisabled(msg.into())
    }

    pub fn upstream(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::Upstream(msg.into())
    }

    /// Short reason suitable for a client-facing message or a task status.
    pub fn reason(&self) -> String {
        match self {
            SystemError::BadRequest(msg)
            | SystemError::NotFound(msg)
            | SystemError::PayloadTooLarge(msg)
            | SystemError::AiDisabled(msg)
            | SystemError::Upstream(msg) => msg.to_string(),
            other => other.to_string(),
        }
    }
}

impl From<SystemError> for Error {
    fn from(value: SystemError) -> Self {
        match value {
            SystemError::BadRequest(msg) => Error::BadRequest(msg),
            SystemError::NotFound(msg) => Error::NotFound(msg),
            SystemError::PayloadTooLarge(msg) => Error::PayloadTooLarge(msg),
            SystemError::AiDisabled(msg) => Error::ServiceUnavailable(msg),
            SystemError::Upstream(msg) => {
                log::error!("Upstream AI failure: {}", msg);
                Error::Upstream(msg)
            }
            SystemError::HttpError(err) => {
                log::error!("Upstream request failed: {:?}", err);
                Error::Upstream(format!("Upstream request failed: {err}").into())
            }
            _ => {
                log::error!("Internal Server Error: {:?}", value);
                Error::InternalServer
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_domain_errors_to_status_codes() {
        let cases = [
            (SystemError::bad_request("x"), StatusCode::BAD_REQUEST),
            (SystemError::not_found("x"), StatusCode::NOT_FOUND),
            (SystemError::payload_too_large("x"), StatusCode::PAYLOAD_TOO_LARGE),
            (SystemError::ai_disabled("x"), StatusCode::SERVICE_UNAVAILABLE),
            (SystemError::upstream("x"), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (system, status) in cases {
            assert_eq!(Error::from(system).status_code(), status);
        }
    }

    #[test]
    fn hides_internal_details() {
        let io = std::io::Error::other("disk on fire");
        let err = Error::from(SystemError::from(io));
        assert!(matches!(err, Error::InternalServer));
    }
}
