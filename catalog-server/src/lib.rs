//! Catalog Server - 商品目录与变体组合引擎
//!
//! # 架构概述
//!
//! 本模块是 Catalog Server 的主入口，提供以下核心功能：
//!
//! - **数据库** (`db`): 嵌入式 SQLite 存储 + 变体组合引擎
//! - **HTTP API** (`api`): RESTful API 接口
//! - **图片上传** (`api::upload`): 内容寻址的图片存储
//!
//! # 模块结构
//!
//! ```text
//! catalog-server/src/
//! ├── core/          # 配置、状态、HTTP 服务器
//! ├── api/           # HTTP 路由和处理器
//! ├── db/            # 数据库层（连接池、迁移、仓储）
//! └── utils/         # 工具函数
//! ```

pub mod api;
pub mod core;
pub mod db;
pub mod utils;

// Re-export 公共类型
pub use core::{Config, Server, ServerState};
pub use utils::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// 设置运行环境：加载 .env、创建工作目录、初始化日志
pub fn setup_environment() -> Result<Config, Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let config = Config::from_env();
    config.ensure_work_dir_structure()?;

    let log_level = std::env::var("LOG_LEVEL").ok();
    if config.is_production() {
        let logs_dir = config.logs_dir();
        init_logger_with_file(log_level.as_deref(), logs_dir.to_str());
    } else {
        init_logger_with_file(log_level.as_deref(), None);
    }

    Ok(config)
}

pub fn print_banner() {
    println!(
        r#"
   ______      __        __
  / ____/___ _/ /_____ _/ /___  ____ _
 / /   / __ `/ __/ __ `/ / __ \/ __ `/
/ /___/ /_/ / /_/ /_/ / / /_/ / /_/ /
\____/\__,_/\__/\__,_/_/\____/\__, /
                             /____/
    "#
    );
}
