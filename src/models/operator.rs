//! 运营商识别
//!
//! 结果页的 logo 地址形如 `https://imagerepo.ding.com/logo/RJ/IN.png`，
//! 路径中的两位代码即运营商标识。

use std::fmt;

use phf::phf_ordered_map;
use serde::{Serialize, Serializer};

/// 运营商表项
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperatorEntry {
    /// 展示名称
    pub name: &'static str,
    /// logo 地址
    pub logo_url: &'static str,
}

/// 运营商代码表，声明顺序即匹配优先级
pub static OPERATORS: phf::OrderedMap<&'static str, OperatorEntry> = phf_ordered_map! {
    "RJ" => OperatorEntry {
        name: "Reliance Jio",
        logo_url: "https://imagerepo.ding.com/logo/RJ/IN.png",
    },
    "BL" => OperatorEntry {
        name: "BSNL",
        logo_url: "https://imagerepo.ding.com/logo/BL/IN.png",
    },
    "VF" => OperatorEntry {
        name: "Vodafone",
        logo_url: "https://imagerepo.ding.com/logo/VF/IN.png",
    },
    "AI" => OperatorEntry {
        name: "Airtel",
        logo_url: "https://imagerepo.ding.com/logo/AI/IN.png",
    },
};

/// 结果行中的运营商标签
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorLabel {
    /// 识别成功
    Resolved(&'static str),
    /// 页面有响应，但代码不在表中
    NotFound,
    /// 自动化过程失败
    Error,
}

impl OperatorLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperatorLabel::Resolved(name) => name,
            OperatorLabel::NotFound => "Not Found",
            OperatorLabel::Error => "Error",
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, OperatorLabel::Resolved(_))
    }
}

impl fmt::Display for OperatorLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for OperatorLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// 识别结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub label: OperatorLabel,
    /// 未识别时为空串
    pub logo_url: &'static str,
}

impl Classification {
    pub const NOT_FOUND: Classification = Classification {
        label: OperatorLabel::NotFound,
        logo_url: "",
    };
}

/// 根据 logo 地址识别运营商
pub fn classify(asset_reference: &str) -> Classification {
    OPERATORS
        .entries()
        .find(|(code, _)| asset_reference.contains(&format!("/{}/", code)))
        .map(|(_, entry)| Classification {
            label: OperatorLabel::Resolved(entry.name),
            logo_url: entry.logo_url,
        })
        .unwrap_or(Classification::NOT_FOUND)
}

/// 按代码查表
pub fn lookup_code(code: &str) -> Option<&'static OperatorEntry> {
    OPERATORS.get(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jio_path_is_recognised() {
        let result = classify("https://imagerepo.ding.com/logo/RJ/IN.png?v=3");
        assert_eq!(result.label, OperatorLabel::Resolved("Reliance Jio"));
        assert_eq!(result.logo_url, "https://imagerepo.ding.com/logo/RJ/IN.png");
    }

    #[test]
    fn every_table_entry_classifies_its_own_logo() {
        for (code, entry) in OPERATORS.entries() {
            let result = classify(entry.logo_url);
            assert_eq!(result.label.as_str(), entry.name, "code {code}");
        }
    }

    #[test]
    fn unknown_token_is_not_found() {
        let result = classify("https://imagerepo.ding.com/logo/XX/IN.png");
        assert_eq!(result, Classification::NOT_FOUND);
        assert_eq!(result.label.to_string(), "Not Found");
        assert_eq!(result.logo_url, "");
    }

    #[test]
    fn token_must_be_a_whole_segment() {
        // "RJX" 不是 "RJ"
        assert_eq!(classify("/logo/RJX/IN.png"), Classification::NOT_FOUND);
        assert_eq!(classify("RJ.png"), Classification::NOT_FOUND);
    }

    #[test]
    fn table_order_breaks_ties() {
        let result = classify("/logo/AI/RJ/IN.png");
        assert_eq!(result.label, OperatorLabel::Resolved("Reliance Jio"));
    }

    #[test]
    fn lookup_by_code() {
        assert_eq!(lookup_code("BL").map(|e| e.name), Some("BSNL"));
        assert!(lookup_code("ZZ").is_none());
    }

    #[test]
    fn labels_render_fixed_strings() {
        assert_eq!(OperatorLabel::Error.to_string(), "Error");
        assert_eq!(
            serde_json::to_string(&OperatorLabel::Resolved("Airtel")).unwrap(),
            "\"Airtel\""
        );
    }
}
