/// ASCII 空白字符
pub const WHITESPACES: &[char] = &[' ', '\t', '\n', '\x0c', '\r'];

/// 候选列表属性，按优先级排列：`srcset` 缺失时才使用 `data-srcset`
pub const CANDIDATE_LIST_ATTRIBUTES: &[&str] = &["srcset", "data-srcset"];

/// 是否为候选列表属性
pub fn is_candidate_list_attribute(attr_name: &str) -> bool {
    CANDIDATE_LIST_ATTRIBUTES
        .iter()
        .any(|candidate| candidate.eq_ignore_ascii_case(attr_name))
}
