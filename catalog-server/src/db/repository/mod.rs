//! Repository Layer
//!
//! 数据访问层 - 每个资源一个模块，所有写操作走事务
//!
//! - [`product`] - 商品及商品图片
//! - [`option`] - 商品选项与选项值
//! - [`variant`] - 变体组合引擎
//! - [`variant_image`] - 变体图片与引用回收

pub mod option;
pub mod product;
pub mod variant;
pub mod variant_image;

use shared::error::{AppError, ErrorCode};

/// Repository-level error, mapped to [`AppError`] at the API boundary
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error("{0}")]
    NotFound(AppError),
    #[error("{0}")]
    Conflict(AppError),
    #[error("{0}")]
    Validation(AppError),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type RepoResult<T> = Result<T, RepoError>;

impl RepoError {
    pub fn not_found(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::NotFound(AppError::with_message(code, message))
    }

    pub fn conflict(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Conflict(AppError::with_message(code, message))
    }

    pub fn validation(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Validation(AppError::with_message(code, message))
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(e) | RepoError::Conflict(e) | RepoError::Validation(e) => e,
            RepoError::Database(e) => AppError::database(e.to_string()),
        }
    }
}

/// 判断是否为 UNIQUE 约束冲突 (并发兜底)
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db) => db.is_unique_violation(),
        _ => false,
    }
}
