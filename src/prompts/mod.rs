//! 提示词构建
//!
//! 模板文本属于配置，放在 `templates`；`builder` 只负责按字段名填充占位符。

pub mod builder;
pub mod templates;

pub use builder::{build_prompt, referenced_fields};
