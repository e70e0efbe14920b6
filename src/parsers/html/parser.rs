//! 候选列表（srcset）解析
//!
//! 解析 `srcset` / `data-srcset` 属性值，得到按原始顺序排列的
//! 图片路径与描述符（宽度描述符如 `480w`，像素密度描述符如 `2x`）。
//!
//! ## 使用示例
//!
//! ```rust
//! use local_images::parsers::html::parser::parse_srcset;
//!
//! let items = parse_srcset("small.jpg 480w, large.jpg 800w");
//! assert_eq!(items.len(), 2);
//! assert_eq!(items[1].path, "large.jpg");
//! assert_eq!(items[1].descriptor, "800w");
//! ```

use std::fmt;

use super::utils::WHITESPACES;

/// SrcSet 属性项目结构
///
/// `descriptor` 为空字符串表示该项没有描述符。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SrcSetItem<'a> {
    /// 图片文件的路径或URL
    pub path: &'a str,
    /// 图片描述符，没有时为空字符串
    pub descriptor: &'a str,
}

impl fmt::Display for SrcSetItem<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.descriptor.is_empty() {
            f.write_str(self.path)
        } else {
            write!(f, "{} {}", self.path, self.descriptor)
        }
    }
}

fn is_separator(c: char) -> bool {
    c == ',' || WHITESPACES.contains(&c)
}

/// 解析HTML图片的srcset属性
///
/// 路径一直延伸到下一个空白字符，因此路径内部的逗号会被保留
/// （例如 `https://img.example.com/w_200,h_100/a.jpg`）；路径末尾的逗号表示该项结束。
/// 描述符延伸到下一个不在括号内的逗号。
pub fn parse_srcset(srcset: &str) -> Vec<SrcSetItem<'_>> {
    let mut srcset_items: Vec<SrcSetItem> = vec![];
    let mut rest = srcset;

    loop {
        rest = rest.trim_start_matches(is_separator);
        if rest.is_empty() {
            break;
        }

        let path_end = rest.find(WHITESPACES).unwrap_or(rest.len());
        let (path, after) = rest.split_at(path_end);

        // 路径以逗号结尾，说明这一项没有描述符
        let trimmed_path = path.trim_end_matches(',');
        if trimmed_path.len() < path.len() {
            srcset_items.push(SrcSetItem {
                path: trimmed_path,
                descriptor: "",
            });
            rest = after;
            continue;
        }

        let mut depth = 0usize;
        let mut descriptor_end = after.len();
        for (i, c) in after.char_indices() {
            match c {
                '(' => depth += 1,
                ')' => depth = depth.saturating_sub(1),
                ',' if depth == 0 => {
                    descriptor_end = i;
                    break;
                }
                _ => {}
            }
        }

        srcset_items.push(SrcSetItem {
            path,
            descriptor: after[..descriptor_end].trim_matches(WHITESPACES),
        });
        rest = &after[descriptor_end..];
    }

    srcset_items
}
