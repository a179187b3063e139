//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`products`] - 商品管理接口（含变体创建）
//! - [`variants`] - 变体管理接口
//! - [`upload`] - 图片上传接口

pub mod health;
pub mod products;
pub mod upload;
pub mod variants;

use http::HeaderMap;

// Re-export common types for handlers
pub use crate::utils::{ApiResponse, AppError, AppResult};

/// 操作者身份取自 `X-Actor-Id` 请求头（认证属于外层网关，不在本服务内）
pub fn actor_id(headers: &HeaderMap) -> i64 {
    headers
        .get("x-actor-id")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
        .unwrap_or(0)
}
