use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use factura_core::DomainError;
use factura_infra::services::ServiceError;

pub fn service_error_to_response(err: ServiceError) -> axum::response::Response {
    match err {
        ServiceError::Domain(e) => domain_error_to_response(e),
        ServiceError::Repository(e) => {
            tracing::error!("repository failure: {e}");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", e.to_string())
        }
    }
}

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    let message = err.to_string();
    match err {
        DomainError::Validation(_) => json_error(StatusCode::BAD_REQUEST, "validation_error", message),
        DomainError::InvalidId(_) => json_error(StatusCode::BAD_REQUEST, "invalid_id", message),
        DomainError::ProductNotFound(_) | DomainError::InvoiceNotFound(_) => {
            json_error(StatusCode::NOT_FOUND, "not_found", message)
        }
        DomainError::ProductAlreadyExists(_) => json_error(StatusCode::CONFLICT, "conflict", message),
        DomainError::StockOutOfRange { .. } => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "stock_out_of_range", message)
        }
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
