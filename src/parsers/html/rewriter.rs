//! 图片节点属性改写
//!
//! 每个匹配的节点最多有两处需要处理：
//!
//! - 主属性：配置的属性列表中第一个存在且非空的属性（例如 `src`、`data-src`、`content`）
//! - 候选列表属性：`srcset`，缺失时使用 `data-srcset`
//!
//! 两者并发处理；候选列表中的所有条目一起等待完成后才写回属性。
//! 处理失败不会向外传播：主属性保持原值，候选列表中失败的条目被移除。

use futures::future::join_all;
use markup5ever_rcdom::Handle;

use crate::core::LocalImagesOptions;
use crate::network::session::Session;
use crate::utils::url::is_external_url;

use super::assets::{AssetOutcome, AssetRegistry};
use super::dom::{get_node_attr, set_node_attr};
use super::parser::{parse_srcset, SrcSetItem};
use super::utils::{is_candidate_list_attribute, CANDIDATE_LIST_ATTRIBUTES};

/// 第一个存在且非空的来源属性，返回 `(属性名, 属性值)`
pub fn active_source_attribute(
    node: &Handle,
    source_attributes: &[String],
) -> Option<(String, String)> {
    source_attributes.iter().find_map(|attr_name| {
        get_node_attr(node, attr_name)
            .filter(|value| !value.trim().is_empty())
            .map(|value| (attr_name.clone(), value))
    })
}

/// 节点上的候选列表属性，`srcset` 优先
pub fn candidate_list_attribute(node: &Handle) -> Option<(&'static str, String)> {
    CANDIDATE_LIST_ATTRIBUTES.iter().find_map(|attr_name| {
        get_node_attr(node, attr_name)
            .filter(|value| !value.trim().is_empty())
            .map(|value| (*attr_name, value))
    })
}

/// 改写候选列表
///
/// 返回 `None` 表示属性无需改动（没有外部地址）；`Some(None)` 表示所有条目都失败，
/// 属性应被删除；`Some(Some(value))` 为新的属性值。
pub async fn rewrite_candidate_list(
    value: &str,
    options: &LocalImagesOptions,
    session: &Session,
    registry: &AssetRegistry,
) -> Option<Option<String>> {
    let items = parse_srcset(value);

    if !items.iter().any(|item| is_external_url(item.path)) {
        return None;
    }

    let outcomes: Vec<Option<AssetOutcome>> = join_all(items.iter().map(|item| async move {
        if is_external_url(item.path) {
            Some(registry.localize(item.path, options, session).await)
        } else {
            None
        }
    }))
    .await;

    let rewritten: Vec<String> = items
        .iter()
        .zip(outcomes)
        .filter_map(|(item, outcome)| match outcome {
            None => Some(item.to_string()),
            Some(Ok(asset)) => Some(
                SrcSetItem {
                    path: &asset.public_path,
                    descriptor: item.descriptor,
                }
                .to_string(),
            ),
            Some(Err(_)) => None,
        })
        .collect();

    if rewritten.is_empty() {
        Some(None)
    } else {
        Some(Some(rewritten.join(", ")))
    }
}

/// 处理单个节点
///
/// 只有在资源成功写入（或复用）后才会修改节点属性。
pub async fn process_node(
    node: &Handle,
    options: &LocalImagesOptions,
    session: &Session,
    registry: &AssetRegistry,
) {
    // 主属性本身就是候选列表时，交给候选列表处理
    let primary = active_source_attribute(node, &options.source_attributes)
        .filter(|(attr_name, _)| !is_candidate_list_attribute(attr_name));
    let candidates = candidate_list_attribute(node);

    let primary_pipeline = async {
        match &primary {
            Some((_, value)) if is_external_url(value.trim()) => {
                Some(registry.localize(value.trim(), options, session).await)
            }
            _ => None,
        }
    };

    let candidate_pipeline = async {
        match &candidates {
            Some((_, value)) => rewrite_candidate_list(value, options, session, registry).await,
            None => None,
        }
    };

    let (primary_outcome, candidate_value) = futures::join!(primary_pipeline, candidate_pipeline);

    if let (Some((attr_name, _)), Some(Ok(asset))) = (&primary, primary_outcome) {
        set_node_attr(node, attr_name, Some(asset.public_path));
    }

    if let (Some((attr_name, _)), Some(new_value)) = (&candidates, candidate_value) {
        set_node_attr(node, attr_name, new_value);
    }
}
