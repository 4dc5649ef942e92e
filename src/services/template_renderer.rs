//! 模板渲染服务 - 业务能力层
//!
//! 把一条记录合并进文档模板，得到一份文档的内容。

use std::path::Path;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::error::AssemblyError;
use crate::models::record::{display_value, Record};

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*([^{}]+?)\s*\}\}").expect("模板占位符正则无效"));

/// 文档模板
pub trait TemplateRenderer: Send + Sync {
    /// 用一条记录渲染文档
    fn render(&self, record: &Record) -> String;

    /// 输出文档的扩展名（不含点）
    fn extension(&self) -> &str;
}

/// `{{ Campo }}` 占位符模板
///
/// 占位符按字段名取值，字段不存在或为 null 时渲染为空。
#[derive(Debug, Clone)]
pub struct PlaceholderTemplate {
    text: String,
    extension: String,
}

impl PlaceholderTemplate {
    pub fn new(text: impl Into<String>, extension: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            extension: extension.into(),
        }
    }

    /// 从文件读取模板，扩展名沿用模板文件的扩展名
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, AssemblyError> {
        let path = path.as_ref();
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| AssemblyError::TemplateRead {
                path: path.display().to_string(),
                source,
            })?;
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("txt")
            .to_string();
        Ok(Self::new(text, extension))
    }

    /// 模板中出现的字段名（按出现顺序，去重）
    pub fn placeholders(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for caps in PLACEHOLDER.captures_iter(&self.text) {
            if let Some(name) = caps.get(1).map(|m| m.as_str()) {
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }
        names
    }
}

impl TemplateRenderer for PlaceholderTemplate {
    fn render(&self, record: &Record) -> String {
        PLACEHOLDER
            .replace_all(&self.text, |caps: &Captures| {
                record.get(&caps[1]).map(display_value).unwrap_or_default()
            })
            .into_owned()
    }

    fn extension(&self) -> &str {
        &self.extension
    }
}
