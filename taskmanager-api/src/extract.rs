/// Request extractors
///
/// [`AppJson`] is `axum::Json` with its rejection routed through
/// [`ApiError`], so malformed or non-JSON bodies get the same `{"err": ...}`
/// shape as every other failure.

use axum::extract::FromRequest;

use crate::error::ApiError;

#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct AppJson<T>(pub T);
