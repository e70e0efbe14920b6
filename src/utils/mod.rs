//! # 工具模块
//!
//! 这个模块包含各种工具函数和实用程序：
//!
//! - URL分类、文件名提取和公共路径拼接
//! - 基于定位符哈希的文件命名
//! - 基于魔数的媒体类型识别与扩展名补全
//!
//! # 模块组织
//!
//! - `url` - 外部URL判断、文件名提取、资源目录与公共路径
//! - `naming` - 内容寻址文件名（哈希 + 基础文件名）
//! - `media` - 文件签名检测、扩展名解析

pub mod media;
pub mod naming;
pub mod url;

// Re-export commonly used items for convenience
pub use media::{detect_media_type, detect_media_type_by_file_name, resolve_extension};
pub use naming::{derive_base_name, locator_hash, AssetName};
pub use url::{asset_directory, is_external_url, locator_file_name, public_asset_path, Url};
