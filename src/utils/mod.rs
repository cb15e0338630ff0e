use actix_web::{web, FromRequest};
use futures_util::future::LocalBoxFuture;
use validator::Validate;

use crate::{api::error, constants::MIB};

/// Rejects anything that could escape the uploads directory.
pub fn ensure_plain_filename(filename: &str) -> Result<&str, error::SystemError> {
    let is_plain = !filename.is_empty()
        && filename != "."
        && !filename.contains("..")
        && !filename.contains(['/', '\\', '\0']);

    if is_plain {
        Ok(filename)
    } else {
        Err(error::SystemError::bad_request(format!("Invalid filename: {filename}")))
    }
}

pub fn bytes_to_mb(bytes: u64) -> f64 {
    bytes as f64 / MIB as f64
}

pub struct ValidatedJson<T>(pub T);

impl<T> FromRequest for ValidatedJson<T>
where
    T: Validate + serde::de::DeserializeOwned + 'static,
{
    type Error = error::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(
        req: &actix_web::HttpRequest,
        payload: &mut actix_web::dev::Payload,
    ) -> Self::Future {
        let fut = web::Json::<T>::from_request(req, payload);

        Box::pin(async move {
            let json = fut.await.map_err(|e| error::Error::BadRequest(e.to_string().into()))?;
            let model = json.into_inner();
            model.validate().map_err(|e| error::Error::BadRequest(e.to_string().into()))?;
            Ok(ValidatedJson(model))
        })
    }
}
