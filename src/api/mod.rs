pub mod products;
pub mod server;

use axum::{http::StatusCode, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;

use crate::state::AppState;
use search_gateway::search::GatewayError;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            code: 200,
            message: "success".to_string(),
            data: Some(data),
        }
    }

    pub fn error(status: StatusCode, message: &str) -> Self {
        Self {
            code: i32::from(status.as_u16()),
            message: message.to_string(),
            data: None,
        }
    }
}

/// HTTP status for each gateway error kind / 错误类型对应的 HTTP 状态码
pub fn error_status(err: &GatewayError) -> StatusCode {
    match err {
        GatewayError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        GatewayError::Transport { .. } if err.is_timeout() => StatusCode::GATEWAY_TIMEOUT,
        GatewayError::Transport { .. } => StatusCode::SERVICE_UNAVAILABLE,
        GatewayError::UpstreamStatus { .. } | GatewayError::Malformed(_) => StatusCode::BAD_GATEWAY,
    }
}

pub type ApiResult<T> = (StatusCode, Json<ApiResponse<T>>);

/// Turn a gateway result into a status + envelope / 转换为响应
pub fn respond<T>(result: Result<T, GatewayError>) -> ApiResult<T> {
    match result {
        Ok(data) => (StatusCode::OK, Json(ApiResponse::success(data))),
        Err(e) => {
            let status = error_status(&e);
            if status.is_server_error() {
                tracing::warn!("Search request failed: {}", e);
            } else {
                tracing::debug!("Search request rejected: {}", e);
            }
            (status, Json(ApiResponse::error(status, &e.to_string())))
        }
    }
}

/// API routes without layers / 路由表
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/health", get(server::health_check))
        .route("/api/products", get(products::list_products))
        .route("/api/products/search", get(products::search_products))
}
