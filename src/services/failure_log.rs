//! 运行日志写入服务 - 业务能力层
//!
//! 只负责"写失败记录"能力，不关心流程

use std::path::{Path, PathBuf};

use chrono::Local;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::models::PassKind;

/// 运行日志
///
/// 职责：
/// - 每次运行开始时写入带时间戳的标题
/// - 每个生成失败的行追加一条记录
/// - 不持有表格，不关心行的执行顺序
#[derive(Debug, Clone)]
pub struct FailureLog {
    path: PathBuf,
}

impl FailureLog {
    /// 使用指定文件路径创建
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 写入本次运行的标题
    ///
    /// # 参数
    /// - `source`: 输入表格路径
    /// - `rows`: 行数
    pub async fn init(&self, source: &str, rows: usize) -> AppResult<()> {
        let header = format!(
            "{}\n运行开始: {} | 输入: {} | 行数: {}\n",
            "=".repeat(60),
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            source,
            rows
        );
        self.append(&header).await
    }

    /// 写入失败记录
    ///
    /// # 参数
    /// - `pass`: 所在阶段
    /// - `row`: 行号（从 1 开始）
    /// - `reason`: 失败原因
    pub async fn record(&self, pass: PassKind, row: usize, reason: &str) -> AppResult<()> {
        debug!("写入失败记录: 阶段 {} | 行 {}", pass, row);

        let line = format!(
            "[{}] 阶段 {} | 行 {} | {}\n",
            Local::now().format("%H:%M:%S"),
            pass,
            row,
            reason.replace('\n', " ")
        );
        self.append(&line).await
    }

    async fn append(&self, text: &str) -> AppResult<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| AppError::write_failed(self.path.display().to_string(), e))?;

        file.write_all(text.as_bytes())
            .await
            .map_err(|e| AppError::write_failed(self.path.display().to_string(), e))?;
        file.flush()
            .await
            .map_err(|e| AppError::write_failed(self.path.display().to_string(), e))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_header_then_records_are_appended() {
        let dir = tempfile::tempdir().unwrap();
        let log = FailureLog::with_path(dir.path().join("registro.txt"));

        log.init("items.json", 5).await.unwrap();
        log.record(PassKind::Analysis, 3, "status 500\nbody").await.unwrap();

        let content = std::fs::read_to_string(log.path()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].contains("items.json"));
        assert!(lines[1].contains("行数: 5"));
        assert!(lines[2].contains("阶段 分析 | 行 3 | status 500 body"));
    }
}
