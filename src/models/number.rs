//! 号码规范化
//!
//! 把任意格式的输入整理成统一的 `+91XXXXXXXXXX` 形式，用于派发和去重。
//! 这里只做尽力而为的规范化，不做校验：无法识别的输入原样透传。

use std::collections::HashSet;
use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

/// 国家代码
pub const COUNTRY_CODE: &str = "91";

/// 规范化号码的前缀
pub const CANONICAL_PREFIX: &str = "+91";

/// 规范化后的号码
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CanonicalNumber(String);

impl CanonicalNumber {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 去掉国家代码前缀后的展示形式
    pub fn display_form(&self) -> &str {
        display_form(&self.0)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for CanonicalNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CanonicalNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

fn non_digits() -> &'static Regex {
    static NON_DIGITS: OnceLock<Regex> = OnceLock::new();
    // 只保留 ASCII 数字，其他文字（包括非拉丁数字）一律去掉
    NON_DIGITS.get_or_init(|| Regex::new(r"[^0-9]").expect("static regex"))
}

/// 规范化单个号码
///
/// - 10 位：补 `+91`
/// - 12 位且以 `91` 开头：补 `+`
/// - 13 位且去掉首位后以 `91` 开头：去掉首位再补 `+`
/// - 其他：返回去掉首尾空白的原文
pub fn normalize(raw: &str) -> CanonicalNumber {
    let trimmed = raw.trim();
    let digits = non_digits().replace_all(trimmed, "");

    let canonical = match digits.len() {
        10 => format!("{}{}", CANONICAL_PREFIX, digits),
        12 if digits.starts_with(COUNTRY_CODE) => format!("+{}", digits),
        13 if digits[1..].starts_with(COUNTRY_CODE) => format!("+{}", &digits[1..]),
        _ => trimmed.to_string(),
    };

    CanonicalNumber(canonical)
}

/// 去掉 `+91` 前缀，其他输入原样返回
pub fn display_form(number: &str) -> &str {
    number.strip_prefix(CANONICAL_PREFIX).unwrap_or(number)
}

/// 按行拆分输入文本，规范化并去重
///
/// 空行会被丢弃；重复号码只保留第一次出现的位置
pub fn collect_numbers(text: &str) -> Vec<CanonicalNumber> {
    collect_lines(text.lines())
}

/// 与 [`collect_numbers`] 相同，但输入已经是逐行的字符串
pub fn collect_lines<I, S>(lines: I) -> Vec<CanonicalNumber>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    lines
        .into_iter()
        .map(|line| normalize(line.as_ref()))
        .filter(|number| !number.is_empty())
        .filter(|number| seen.insert(number.clone()))
        .collect()
}
