//! # 解析器模块
//!
//! 这个模块包含HTML文档的解析、节点选择与改写功能：
//!
//! - HTML解析和DOM操作
//! - CSS选择器匹配
//! - 图片属性与 srcset 改写
//!
//! # 模块组织
//!
//! - `html` - HTML文档解析、DOM操作、选择器、资源本地化、序列化

pub mod html;

// Re-export commonly used items for convenience
pub use html::{html_to_dom, process_node, serialize_document, SelectorList};
