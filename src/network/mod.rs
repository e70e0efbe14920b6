//! # 网络模块
//!
//! 这个模块包含所有与远程资源下载和本地持久化相关的功能：
//!
//! - HTTP会话管理和资源下载
//! - 资源文件的原子写入与已有资源查找
//!
//! # 模块组织
//!
//! - `session` - HTTP会话管理、单次GET请求、失败分类
//! - `store` - 本地资源目录的写入与复用查找

pub mod session;
pub mod store;

// Re-export commonly used items for convenience
pub use session::{Session, DEFAULT_USER_AGENT};
pub use store::{find_existing, store};
