use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use serde::de::DeserializeOwned;

use crate::response::AppError;

/// `axum::Json<T>` that rejects with an `AppError` body instead of plain text.
pub struct JsonBody<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match axum::Json::<T>::from_request(req, state).await {
            Ok(axum::Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => Err(json_rejection_to_app_error(rejection)),
        }
    }
}

fn json_rejection_to_app_error(rejection: JsonRejection) -> AppError {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        tracing::warn!(error = %rejection, "JSON body over size limit");
        return AppError::payload_too_large("请求体过大");
    }
    let message = match &rejection {
        JsonRejection::JsonDataError(_) => "请求体字段无效",
        JsonRejection::JsonSyntaxError(_) => "请求体不是合法的 JSON",
        JsonRejection::MissingJsonContentType(_) => "Content-Type 必须为 application/json",
        JsonRejection::BytesRejection(_) => "无法读取请求体",
        _ => "请求体格式无效",
    };
    tracing::warn!(error = %rejection, "JSON body rejected");
    AppError::bad_request("INVALID_REQUEST_BODY", message)
}
