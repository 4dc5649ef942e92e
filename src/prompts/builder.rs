//! 提示词构建
//!
//! 用记录中的字段填充阶段模板，不产生任何副作用。

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::models::pass::{is_sentinel, PassKind};
use crate::models::record::Record;
use crate::prompts::templates::{
    ANALYSIS_SLOTS, ANALYSIS_TEMPLATE, RECOMMENDATION_SLOTS, RECOMMENDATION_TEMPLATE,
};

static SLOT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{([^{}]+)\}\}").expect("占位符正则无效"));

/// 构建提示词
///
/// 纯函数：同一条记录和同一阶段总是得到相同的提示词。
///
/// 字段取值规则：
/// - 字段不存在：使用该占位符的缺省文本（`No aplica` 或空字符串）
/// - 字段为 null：空字符串
/// - 分析阶段写入的列若为哨兵值，视为不存在；源数据字段原样使用
pub fn build_prompt(record: &Record, kind: PassKind) -> String {
    let (template, slots) = template_for(kind);

    SLOT.replace_all(template, |caps: &Captures| {
        let field = &caps[1];
        match slots.iter().find(|(name, _)| *name == field) {
            Some((name, default)) => resolve(record, name, default),
            None => caps[0].to_string(),
        }
    })
    .into_owned()
}

/// 某阶段提示词引用的字段
pub fn referenced_fields(kind: PassKind) -> impl Iterator<Item = &'static str> {
    template_for(kind).1.iter().map(|(name, _)| *name)
}

fn template_for(kind: PassKind) -> (&'static str, &'static [(&'static str, &'static str)]) {
    match kind {
        PassKind::Analysis => (ANALYSIS_TEMPLATE, ANALYSIS_SLOTS),
        PassKind::Recommendation => (RECOMMENDATION_TEMPLATE, RECOMMENDATION_SLOTS),
    }
}

fn resolve(record: &Record, field: &str, default: &str) -> String {
    match record.text(field) {
        Some(value) if is_derived(field) && is_sentinel(&value) => default.to_string(),
        Some(value) => value,
        None => default.to_string(),
    }
}

fn is_derived(field: &str) -> bool {
    PassKind::Analysis.columns().contains(&field)
}
