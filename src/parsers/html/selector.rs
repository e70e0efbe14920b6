//! CSS 选择器解析与匹配
//!
//! 选择器由 `scraper`（基于 `selectors`）编译，支持完整的 CSS 选择器语法，
//! 包括兄弟组合符与 `:not()`、`:first-of-type` 等结构性伪类。
//!
//! 节点的改写在 rcdom 上进行。`scraper` 使用同一个 html5ever 解析同一份源文本，
//! 因此两棵树中元素的文档顺序一致，匹配结果按文档顺序映射回 rcdom 节点。
//! `<template>` 的内容不属于文档树，两边都不参与匹配。
//! 单纯的类型选择器（例如默认的 `img`）直接在 rcdom 上匹配，不需要第二次解析。

use std::collections::HashMap;
use std::fmt;

use markup5ever_rcdom::{Handle, RcDom};
use scraper::{Html, Selector};
use thiserror::Error;

use super::dom::{find_elements, get_node_name};

/// 选择器解析错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    #[error("selector is empty")]
    Empty,
    #[error("{0}")]
    Invalid(String),
}

#[derive(Clone, Debug)]
enum Matcher {
    Tag(String),
    Css(Selector),
}

/// 编译后的选择器列表
#[derive(Clone, Debug)]
pub struct SelectorList {
    source: String,
    matcher: Matcher,
}

impl SelectorList {
    /// 解析逗号分隔的选择器列表
    pub fn parse(source: &str) -> Result<SelectorList, SelectorError> {
        let source = source.trim();
        if source.is_empty() {
            return Err(SelectorError::Empty);
        }

        let selector =
            Selector::parse(source).map_err(|e| SelectorError::Invalid(e.to_string()))?;

        Ok(SelectorList {
            source: source.to_string(),
            matcher: Matcher::Css(selector),
        })
    }

    /// 匹配单个元素名的选择器
    pub fn tag(name: &str) -> SelectorList {
        SelectorList {
            source: name.to_string(),
            matcher: Matcher::Tag(name.to_ascii_lowercase()),
        }
    }

    /// 按文档顺序返回 `dom` 中匹配的元素，`raw` 为解析出 `dom` 的源文本
    pub fn select(&self, raw: &str, dom: &RcDom) -> Vec<Handle> {
        match &self.matcher {
            Matcher::Tag(name) => find_elements(&dom.document, &|node| {
                get_node_name(node).is_some_and(|node_name| node_name.eq_ignore_ascii_case(name))
            }),
            Matcher::Css(selector) => {
                let positions = matched_positions(selector, raw);
                if positions.matched.is_empty() {
                    return Vec::new();
                }

                let elements = find_elements(&dom.document, &|_| true);
                if elements.len() != positions.element_count {
                    tracing::warn!(
                        "Document trees disagree ({} vs {} elements), skipping selector '{}'",
                        elements.len(),
                        positions.element_count,
                        self.source
                    );
                    return Vec::new();
                }

                positions
                    .matched
                    .into_iter()
                    .filter_map(|position| elements.get(position).cloned())
                    .collect()
            }
        }
    }
}

impl PartialEq for SelectorList {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl fmt::Display for SelectorList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

struct MatchedPositions {
    /// 文档树中的元素总数
    element_count: usize,
    /// 匹配元素的文档顺序下标，升序
    matched: Vec<usize>,
}

fn matched_positions(selector: &Selector, raw: &str) -> MatchedPositions {
    let document = Html::parse_document(raw);

    let mut positions = HashMap::new();
    for node in document.tree.root().descendants() {
        if !node.value().is_element() {
            continue;
        }

        let in_template = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|element| element.name() == "template")
        });
        if !in_template {
            positions.insert(node.id(), positions.len());
        }
    }

    // select() 按节点创建顺序遍历，需要重新排序
    let mut matched: Vec<usize> = document
        .select(selector)
        .filter_map(|element| positions.get(&element.id()).copied())
        .collect();
    matched.sort_unstable();
    matched.dedup();

    MatchedPositions {
        element_count: positions.len(),
        matched,
    }
}
