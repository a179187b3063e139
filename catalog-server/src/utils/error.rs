//! 统一错误处理
//!
//! 错误类型定义在 `shared::error`，这里仅做再导出，
//! 保证 server 内部只有一条错误类型的导入路径。
//!
//! # 错误码规范
//!
//! | 区间 | 分类 |
//! |------|------|
//! | 0-999 | 通用错误 |
//! | 6xxx | 目录业务错误（商品/选项/变体/图片/上传） |
//! | 9xxx | 系统错误 |

pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
