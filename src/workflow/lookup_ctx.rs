//! 号码处理上下文
//!
//! 封装"我正在处理本批次的第几个号码"这一信息

use std::fmt::Display;

use crate::models::CanonicalNumber;

/// 号码处理上下文
#[derive(Debug, Clone)]
pub struct LookupCtx {
    /// 在批次中的序号（从1开始）
    pub position: usize,

    /// 批次总数（仅用于日志显示）
    pub total: usize,

    /// 规范化号码
    pub number: CanonicalNumber,
}

impl LookupCtx {
    pub fn new(position: usize, total: usize, number: CanonicalNumber) -> Self {
        Self {
            position,
            total,
            number,
        }
    }
}

impl Display for LookupCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[号码 {}/{} {}]", self.position, self.total, self.number)
    }
}
