use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::TableError;

/// 表格中的一行（一道评测题目）
///
/// 字段按出现顺序保存。字段只能追加，已有字段不会被修改。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: Map<String, Value>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// 读取字段的显示文本
    ///
    /// # 返回
    /// - 字段不存在: `None`
    /// - 值为 null: `Some("")`
    /// - 其他标量: 原样转为字符串（数字不带引号）
    pub fn text(&self, field: &str) -> Option<String> {
        self.fields.get(field).map(display_value)
    }

    /// 追加新字段
    pub fn append(&mut self, field: impl Into<String>, value: impl Into<Value>) -> Result<(), TableError> {
        let field = field.into();
        if self.fields.contains_key(&field) {
            return Err(TableError::ColumnExists { column: field });
        }
        self.fields.insert(field, value.into());
        Ok(())
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub(crate) fn fields_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// 单元格值的显示文本
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_distinguishes_absent_and_null() {
        let record: Record = serde_json::from_value(json!({
            "Pregunta": "¿Cuánto es 2 + 2?",
            "ItemGradoId": 3,
            "Imagen_pregunta": null
        }))
        .unwrap();

        assert_eq!(record.text("Pregunta").as_deref(), Some("¿Cuánto es 2 + 2?"));
        assert_eq!(record.text("ItemGradoId").as_deref(), Some("3"));
        assert_eq!(record.text("Imagen_pregunta").as_deref(), Some(""));
        assert_eq!(record.text("ItemContexto"), None);
    }

    #[test]
    fn test_append_never_overwrites() {
        let mut record: Record = [("ItemId", "MAT-01")].into_iter().collect();
        record.append("Que_Evalua", "Suma simple.").unwrap();
        assert!(record.append("ItemId", "otro").is_err());
        assert_eq!(record.text("ItemId").as_deref(), Some("MAT-01"));

        let names: Vec<&str> = record.field_names().collect();
        assert_eq!(names, vec!["ItemId", "Que_Evalua"]);
    }
}
