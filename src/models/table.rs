use serde_json::Value;

use crate::error::TableError;
use crate::models::record::Record;

/// 题目表格
///
/// 持有全部记录和列顺序。行顺序从载入到输出始终不变。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemTable {
    records: Vec<Record>,
    columns: Vec<String>,
}

impl ItemTable {
    /// 由记录构建表格，列顺序按首次出现排列
    pub fn new(records: Vec<Record>) -> Self {
        let mut columns: Vec<String> = Vec::new();
        for record in &records {
            for name in record.field_names() {
                if !columns.iter().any(|c| c == name) {
                    columns.push(name.to_string());
                }
            }
        }
        Self { records, columns }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// 追加一整列
    ///
    /// # 参数
    /// - `column`: 新列名，不能与已有列重名
    /// - `values`: 按行顺序排列的值，数量必须等于行数
    pub fn append_column<V: Into<Value>>(
        &mut self,
        column: &str,
        values: Vec<V>,
    ) -> Result<(), TableError> {
        if values.len() != self.records.len() {
            return Err(TableError::ColumnLengthMismatch {
                column: column.to_string(),
                values: values.len(),
                rows: self.records.len(),
            });
        }
        if self.has_column(column) {
            return Err(TableError::ColumnExists {
                column: column.to_string(),
            });
        }

        for (record, value) in self.records.iter_mut().zip(values) {
            record.append(column, value)?;
        }
        self.columns.push(column.to_string());
        Ok(())
    }
}
