//! # Local Images Library
//!
//! 构建产物转换工具：下载 HTML 中引用的远程图片，按内容寻址文件名保存到本地，
//! 并把文档中的引用改写为本地路径。
//!
//! ## 模块组织
//!
//! - `core` - 错误类型、转换配置、文档转换入口
//! - `config` - 插件选项（TOML / 宿主传入）
//! - `env` - 环境变量覆盖
//! - `parsers` - HTML解析、选择器、属性改写
//! - `network` - 资源下载与本地存储
//! - `utils` - 文件命名、扩展名识别、URL工具

pub mod config;
pub mod core;
pub mod env;
pub mod network;
pub mod parsers;
pub mod utils;

// Re-export commonly used items for convenience
pub use config::PluginOptions;
pub use core::*;
pub use network::*;
pub use parsers::*;
pub use utils::*;
