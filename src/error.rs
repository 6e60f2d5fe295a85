use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(#[from] sea_orm::DbErr),

    #[error("Duplicate invoice number: {0}")]
    DuplicateInvoiceNumber(String),

    #[error("Invalid line item: {0}")]
    InvalidLineItem(String),

    #[error("Order not found: {0}")]
    OrderNotFound(String),

    #[error("Corrupt record: {0}")]
    CorruptRecord(String),

    #[error("Catalog conflict: {0}")]
    CatalogConflict(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("External API error: {0}")]
    ExternalApiError(String),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("HTTP request error: {0}")]
    ReqwestError(#[from] reqwest::Error),

    #[error("JSON serialization/deserialization error: {0}")]
    SerdeJsonError(#[from] serde_json::Error),
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let (status_code, error_code, message) = match self {
            AppError::StorageUnavailable(err) => {
                log::error!("Storage unavailable: {err}");
                (
                    actix_web::http::StatusCode::SERVICE_UNAVAILABLE,
                    "STORAGE_UNAVAILABLE",
                    &"Storage unavailable".to_string(),
                )
            }
            AppError::DuplicateInvoiceNumber(num) => {
                log::warn!("Duplicate invoice number: {num}");
                (
                    actix_web::http::StatusCode::CONFLICT,
                    "DUPLICATE_INVOICE_NUMBER",
                    num,
                )
            }
            AppError::InvalidLineItem(msg) => {
                log::warn!("Invalid line item: {msg}");
                (
                    actix_web::http::StatusCode::BAD_REQUEST,
                    "INVALID_LINE_ITEM",
                    msg,
                )
            }
            AppError::OrderNotFound(msg) => (
                actix_web::http::StatusCode::NOT_FOUND,
                "ORDER_NOT_FOUND",
                msg,
            ),
            AppError::CorruptRecord(msg) => {
                log::error!("Corrupt record: {msg}");
                (
                    actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                    "CORRUPT_RECORD",
                    msg,
                )
            }
            AppError::CatalogConflict(msg) => {
                log::warn!("Catalog conflict: {msg}");
                (
                    actix_web::http::StatusCode::CONFLICT,
                    "CATALOG_CONFLICT",
                    msg,
                )
            }
            AppError::ValidationError(msg) => {
                log::warn!("Validation error: {msg}");
                (
                    actix_web::http::StatusCode::BAD_REQUEST,
                    "VALIDATION_ERROR",
                    msg,
                )
            }
            AppError::NotFound(msg) => (actix_web::http::StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            AppError::ExternalApiError(msg) => {
                log::error!("External API error: {msg}");
                (
                    actix_web::http::StatusCode::BAD_GATEWAY,
                    "EXTERNAL_API_ERROR",
                    msg,
                )
            }
            AppError::ReqwestError(err) => {
                log::error!("HTTP request error: {err}");
                (
                    actix_web::http::StatusCode::BAD_GATEWAY,
                    "EXTERNAL_API_ERROR",
                    &"Upstream request failed".to_string(),
                )
            }
            _ => {
                log::error!("Internal error: {self}");
                (
                    actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    &"Internal server error".to_string(),
                )
            }
        };

        HttpResponse::build(status_code).json(json!({
            "success": false,
            "error": {
                "code": error_code,
                "message": message
            }
        }))
    }
}
