//! 文档组装 - 编排层
//!
//! 把增强后的每一行渲染成一份文档，按行标识命名后打进同一个压缩包。

use tracing::info;

use crate::error::AssemblyError;
use crate::models::record::display_value;
use crate::models::ItemTable;
use crate::services::{ArchiveWriter, FileNamer, TemplateRenderer};

/// 组装结果
#[derive(Debug, Clone)]
pub struct DocumentArchive {
    /// zip 字节
    pub bytes: Vec<u8>,
    /// 压缩包内的文件名，按行顺序
    pub entries: Vec<String>,
}

/// 组装文档压缩包
///
/// # 参数
/// - `table`: 增强后的表格
/// - `template`: 文档模板
/// - `id_column`: 用于命名文档的列
///
/// # 返回
/// 每行一份文档；`id_column` 不存在时返回 `MissingColumn`，列出可用列名
pub fn assemble(
    table: &ItemTable,
    template: &dyn TemplateRenderer,
    id_column: &str,
) -> Result<DocumentArchive, AssemblyError> {
    if !table.has_column(id_column) {
        return Err(AssemblyError::MissingColumn {
            column: id_column.to_string(),
            available: table.columns().to_vec(),
        });
    }

    info!("📄 正在生成 {} 份文档 (命名列: {})", table.len(), id_column);

    let mut namer = FileNamer::new();
    let mut writer = ArchiveWriter::new();

    for (index, record) in table.records().iter().enumerate() {
        let raw_id = record.get(id_column).map(display_value).unwrap_or_default();
        let name = namer.next_name(&raw_id, index + 1, template.extension());
        let document = template.render(record);
        writer.add(&name, document.as_bytes())?;
    }

    let (bytes, entries) = writer.finish()?;
    info!("✓ 压缩包已生成: {} 份文档, {} 字节", entries.len(), bytes.len());

    Ok(DocumentArchive { bytes, entries })
}
