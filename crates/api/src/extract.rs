//! Request extractors that reject with [`AppError`] instead of axum's
//! plain-text rejections, so malformed input gets the same JSON error body
//! (`VALIDATION_ERROR`) as every other failure.

use axum::extract::{FromRequest, FromRequestParts, Request};
use axum::Json;
use serde::de::DeserializeOwned;
use stockroom_core::error::CoreError;
use validator::Validate;

use crate::error::AppError;

/// Query string extractor with JSON error responses.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct ApiQuery<T>(pub T);

/// JSON body extractor that also runs the body's [`Validate`] rules.
#[derive(Debug)]
pub struct ValidJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        value
            .validate()
            .map_err(|errors| AppError::Core(CoreError::Validation(errors.to_string())))?;
        Ok(ValidJson(value))
    }
}
