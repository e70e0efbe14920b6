//! HTML解析和处理模块
//!
//! 这个模块被拆分为多个子模块：
//!
//! - `utils`: 基础常量
//! - `dom`: 基础DOM操作
//! - `selector`: CSS选择器编译与匹配（scraper）
//! - `parser`: srcset 候选列表解析
//! - `assets`: 远程资源下载、保存与去重
//! - `rewriter`: 图片节点属性改写
//! - `serializer`: 序列化功能

pub mod assets;
pub mod dom;
pub mod parser;
pub mod rewriter;
pub mod selector;
pub mod serializer;
pub mod utils;

pub use assets::{localize_asset, AssetOutcome, AssetRegistry, LocalAsset};
pub use dom::{find_elements, get_node_attr, get_node_name, html_to_dom, set_node_attr};
pub use parser::{parse_srcset, SrcSetItem};
pub use rewriter::{active_source_attribute, candidate_list_attribute, process_node};
pub use selector::{SelectorError, SelectorList};
pub use serializer::serialize_document;
pub use utils::{is_candidate_list_attribute, CANDIDATE_LIST_ATTRIBUTES, WHITESPACES};
