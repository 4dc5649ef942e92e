use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::fs;

use crate::error::{AppError, AppResult, TableError};
use crate::models::record::Record;
use crate::models::table::ItemTable;

static HTML_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<.*?>").expect("HTML 标签正则无效"));

/// 表格文件格式（按扩展名判断）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Json,
    Toml,
}

impl TableFormat {
    pub fn from_path(path: &Path) -> Result<Self, TableError> {
        match path
            .extension()
            .and_then(|s| s.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("json") => Ok(TableFormat::Json),
            Some("toml") => Ok(TableFormat::Toml),
            _ => Err(TableError::UnsupportedFormat {
                path: path.display().to_string(),
            }),
        }
    }
}

/// TOML 表格的外层结构：`[[items]]`
#[derive(Debug, Serialize, Deserialize)]
struct TomlItems {
    items: Vec<Map<String, Value>>,
}

/// 去掉文本中的 HTML 标签
pub fn strip_html(text: &str) -> String {
    HTML_TAG.replace_all(text, "").into_owned()
}

/// 从文件加载题目表格
///
/// 所有字符串单元格会去掉 HTML 标签。
///
/// # 参数
/// - `path`: `.json`（对象数组或 `{"items": [...]}`）或 `.toml`（`[[items]]`）
pub async fn load_table(path: impl AsRef<Path>) -> Result<ItemTable, TableError> {
    let path = path.as_ref();
    let format = TableFormat::from_path(path)?;
    let content = fs::read_to_string(path)
        .await
        .map_err(|source| TableError::ReadFailed {
            path: path.display().to_string(),
            source,
        })?;

    let table = parse_table(&content, format, &path.display().to_string())?;
    tracing::info!(
        "成功加载 {} 行, {} 列: {}",
        table.len(),
        table.columns().len(),
        path.file_name().unwrap_or_default().to_string_lossy()
    );
    Ok(table)
}

/// 解析表格文本
pub fn parse_table(content: &str, format: TableFormat, origin: &str) -> Result<ItemTable, TableError> {
    let parse_failed = |reason: String| TableError::ParseFailed {
        path: origin.to_string(),
        reason,
    };

    let rows: Vec<Value> = match format {
        TableFormat::Json => match serde_json::from_str::<Value>(content)
            .map_err(|e| parse_failed(e.to_string()))?
        {
            Value::Array(rows) => rows,
            Value::Object(mut obj) => match obj.remove("items") {
                Some(Value::Array(rows)) => rows,
                _ => return Err(parse_failed("缺少 items 数组".to_string())),
            },
            _ => return Err(parse_failed("顶层必须是数组或对象".to_string())),
        },
        TableFormat::Toml => {
            let parsed: TomlItems =
                toml::from_str(content).map_err(|e| parse_failed(e.to_string()))?;
            parsed.items.into_iter().map(Value::Object).collect()
        }
    };

    let mut records = Vec::with_capacity(rows.len());
    for (index, row) in rows.into_iter().enumerate() {
        match row {
            Value::Object(fields) => {
                let mut record = Record::from_map(fields);
                clean_record(&mut record);
                records.push(record);
            }
            _ => return Err(TableError::RowNotObject { row: index + 1 }),
        }
    }

    Ok(ItemTable::new(records))
}

fn clean_record(record: &mut Record) {
    for value in record.fields_mut().values_mut() {
        if let Value::String(text) = value {
            if text.contains('<') {
                *text = strip_html(text);
            }
        }
    }
}

/// 把表格写回文件，格式由扩展名决定
pub async fn save_table(table: &ItemTable, path: impl AsRef<Path>) -> AppResult<()> {
    let path = path.as_ref();
    let content = render_table(table, TableFormat::from_path(path)?)?;
    fs::write(path, content)
        .await
        .map_err(|e| AppError::write_failed(path.display().to_string(), e))?;
    tracing::info!("✓ 增强后的表格已保存: {}", path.display());
    Ok(())
}

/// 序列化表格
pub fn render_table(table: &ItemTable, format: TableFormat) -> Result<String, TableError> {
    match format {
        TableFormat::Json => serde_json::to_string_pretty(table.records())
            .map_err(|e| TableError::SerializeFailed(e.to_string())),
        TableFormat::Toml => {
            // TOML 没有 null，空值写成空字符串
            let items = table
                .records()
                .iter()
                .map(|record| {
                    record
                        .fields()
                        .iter()
                        .map(|(k, v)| {
                            let v = if v.is_null() { Value::String(String::new()) } else { v.clone() };
                            (k.clone(), v)
                        })
                        .collect::<Map<String, Value>>()
                })
                .collect();
            toml::to_string_pretty(&TomlItems { items })
                .map_err(|e| TableError::SerializeFailed(e.to_string()))
        }
    }
}
