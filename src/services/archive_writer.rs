//! 压缩包写入服务 - 业务能力层
//!
//! 只负责"把若干文档打成一个 zip"能力，不关心文档内容从哪里来

use std::collections::{HashMap, HashSet};
use std::io::{Cursor, Write};

use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::AssemblyError;

/// 内存中的 zip 写入器
pub struct ArchiveWriter {
    zip: ZipWriter<Cursor<Vec<u8>>>,
    options: SimpleFileOptions,
    entries: Vec<String>,
}

impl ArchiveWriter {
    pub fn new() -> Self {
        Self {
            zip: ZipWriter::new(Cursor::new(Vec::new())),
            options: SimpleFileOptions::default().compression_method(CompressionMethod::Deflated),
            entries: Vec::new(),
        }
    }

    /// 写入一个文件
    ///
    /// # 参数
    /// - `name`: 压缩包内的文件名（调用方保证唯一）
    /// - `content`: 文件内容
    pub fn add(&mut self, name: &str, content: &[u8]) -> Result<(), AssemblyError> {
        let archive_error = |source| AssemblyError::Archive {
            entry: name.to_string(),
            source,
        };

        self.zip
            .start_file(name, self.options)
            .map_err(archive_error)?;
        self.zip
            .write_all(content)
            .map_err(|e| archive_error(e.into()))?;

        debug!("已写入压缩包条目: {} ({} 字节)", name, content.len());
        self.entries.push(name.to_string());
        Ok(())
    }

    /// 结束写入，返回压缩包字节和条目列表
    pub fn finish(self) -> Result<(Vec<u8>, Vec<String>), AssemblyError> {
        let cursor = self.zip.finish().map_err(|source| AssemblyError::Archive {
            entry: "<central directory>".to_string(),
            source,
        })?;
        Ok((cursor.into_inner(), self.entries))
    }
}

impl Default for ArchiveWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// 把行标识转成安全的文件名主干
///
/// 路径分隔符、Windows 保留字符和控制字符替换为 `_`，首尾空白去掉。
/// 结果为空时返回 `None`。
pub fn sanitize_file_name(raw: &str) -> Option<String> {
    let cleaned: String = raw
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    let cleaned = cleaned.trim_matches('.').to_string();
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

/// 生成不重复的文件名
///
/// 同名文件依次追加 `_2`、`_3`…，空名使用 `ficha_<行号>`。
/// 比较时忽略大小写，解压到不区分大小写的文件系统也不会互相覆盖。
#[derive(Debug, Default)]
pub struct FileNamer {
    used: HashSet<String>,
    next_suffix: HashMap<String, usize>,
}

impl FileNamer {
    pub fn new() -> Self {
        Self::default()
    }

    /// # 参数
    /// - `raw`: 行标识原始文本
    /// - `row`: 行号（从 1 开始）
    /// - `extension`: 扩展名（不含点）
    pub fn next_name(&mut self, raw: &str, row: usize, extension: &str) -> String {
        let stem = sanitize_file_name(raw).unwrap_or_else(|| format!("ficha_{}", row));
        let key = stem.to_lowercase();

        let mut candidate = stem.clone();
        if self.used.contains(&key) {
            let mut suffix = self.next_suffix.get(&key).copied().unwrap_or(2);
            loop {
                candidate = format!("{}_{}", stem, suffix);
                suffix += 1;
                if !self.used.contains(&candidate.to_lowercase()) {
                    break;
                }
            }
            self.next_suffix.insert(key, suffix);
        }
        self.used.insert(candidate.to_lowercase());

        if extension.is_empty() {
            candidate
        } else {
            format!("{}.{}", candidate, extension)
        }
    }
}
