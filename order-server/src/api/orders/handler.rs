//! Order API Handlers
//!
//! The caller is already authenticated upstream; the gateway forwards the
//! caller's identity in the `user-id` header.

use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
};

use crate::core::ServerState;
use shared::models::{CreateOrderRequest, Order, UpdateStatusRequest};
use shared::response::ApiResponse;
use shared::{AppError, AppResult};

/// Header carrying the caller's identity
const USER_ID_HEADER: &str = "user-id";

/// Extract the caller's user id from the request headers
fn require_user_id(headers: &HeaderMap) -> AppResult<String> {
    headers
        .get(USER_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
        .ok_or_else(|| AppError::validation("User ID is required in headers"))
}

/// GET /orders - 获取当前用户的所有订单
pub async fn list(
    State(state): State<ServerState>,
    headers: HeaderMap,
) -> AppResult<Json<ApiResponse<Vec<Order>>>> {
    let user_id = require_user_id(&headers)?;
    let orders = state.orders.list_orders(&user_id)?;
    Ok(Json(ApiResponse::success(orders)))
}

/// GET /orders/:id - 获取单个订单
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let order = state
        .orders
        .get_order(&id)?
        .ok_or_else(|| AppError::not_found("Order"))?;
    Ok(Json(ApiResponse::success(order)))
}

/// POST /orders - 创建订单
///
/// Success is decided at the commit boundary: a degraded settlement still
/// answers 201, with the order carrying `pending_review` and a diagnostic.
pub async fn create(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Json(request): Json<CreateOrderRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Order>>)> {
    let user_id = require_user_id(&headers)?;
    let order = state.orders.create_order(&user_id, &request.items).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(order))))
}

/// PATCH /orders/:id/status - 更新订单状态
pub async fn update_status(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateStatusRequest>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let order = state.orders.update_status(&id, &request.status).await?;
    Ok(Json(ApiResponse::success(order)))
}

/// DELETE /orders/:id - 取消订单 (仅限 pending)
pub async fn cancel(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let order = state.orders.cancel_order(&id).await?;
    Ok(Json(ApiResponse::success(order)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_user_id() {
        let mut headers = HeaderMap::new();
        assert!(require_user_id(&headers).is_err());

        headers.insert(USER_ID_HEADER, "user-1".parse().unwrap());
        assert_eq!(require_user_id(&headers).unwrap(), "user-1");
    }

    #[test]
    fn test_require_user_id_rejects_empty_value() {
        let mut headers = HeaderMap::new();
        headers.insert(USER_ID_HEADER, "".parse().unwrap());
        assert!(require_user_id(&headers).is_err());
    }
}
