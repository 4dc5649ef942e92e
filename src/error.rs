//! 错误类型
//!
//! 按层次划分错误类别，`AppError` 统一包装。
//! 行级的 `GenerationError` 在流程层被吸收，不会中断整批处理。

use thiserror::Error;

/// 装箱的底层错误
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 配置错误（启动前致命）
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 文本生成错误
    #[error("生成错误: {0}")]
    Generation(#[from] GenerationError),
    /// 表格错误
    #[error("表格错误: {0}")]
    Table(#[from] TableError),
    /// 文档组装错误
    #[error("组装错误: {0}")]
    Assembly(#[from] AssemblyError),
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 未提供 API 密钥
    #[error("缺少 API 密钥 (可通过 --api-key 或环境变量 {env_hint} 提供)")]
    MissingCredential { env_hint: String },
    /// API 密钥格式无效
    #[error("API 密钥无效: {reason}")]
    InvalidCredential { reason: String },
    /// 配置项取值无效
    #[error("配置项 {field} 的值 '{value}' 无效, 期望: {expected}")]
    InvalidValue {
        field: String,
        value: String,
        expected: String,
    },
    /// 配置文件读取失败
    #[error("读取配置文件失败 ({path}): {source}")]
    FileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 配置文件解析失败
    #[error("解析配置文件失败 ({path}): {source}")]
    FileParse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    /// HTTP 客户端构建失败
    #[error("无法创建 HTTP 客户端: {0}")]
    HttpClient(#[source] reqwest::Error),
}

/// 文本生成错误
///
/// 不再细分：传输失败、超时、配额、安全拦截都归为这一类，底层原因挂在 `source` 上。
#[derive(Debug, Error)]
#[error("文本生成调用失败 (模型: {model}): {source}")]
pub struct GenerationError {
    pub model: String,
    #[source]
    pub source: BoxError,
}

impl GenerationError {
    pub fn new(model: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self {
            model: model.into(),
            source: source.into(),
        }
    }
}

/// 生成服务返回的异常结果，作为 `GenerationError` 的底层原因
#[derive(Debug, Error)]
pub enum ProviderFault {
    /// 非 2xx 响应
    #[error("服务返回状态码 {status}: {body}")]
    BadStatus { status: u16, body: String },
    /// 提示词被安全策略拦截
    #[error("提示词被安全策略拦截: {reason}")]
    Blocked { reason: String },
    /// 没有候选结果或文本为空
    #[error("生成结果为空")]
    EmptyCompletion,
    /// 响应无法解析
    #[error("响应解析失败: {0}")]
    InvalidResponse(String),
}

/// 表格错误
#[derive(Debug, Error)]
pub enum TableError {
    /// 读取表格文件失败
    #[error("读取表格失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 不支持的文件格式
    #[error("不支持的表格格式: {path} (支持 .json / .toml)")]
    UnsupportedFormat { path: String },
    /// 表格内容无法解析
    #[error("表格解析失败 ({path}): {reason}")]
    ParseFailed { path: String, reason: String },
    /// 行不是对象
    #[error("第 {row} 行不是键值对象")]
    RowNotObject { row: usize },
    /// 追加列的长度与行数不一致
    #[error("列 {column} 有 {values} 个值, 但表格有 {rows} 行")]
    ColumnLengthMismatch {
        column: String,
        values: usize,
        rows: usize,
    },
    /// 列已存在（记录只能追加新字段）
    #[error("列 {column} 已存在, 不能覆盖已有字段")]
    ColumnExists { column: String },
    /// 序列化失败
    #[error("表格序列化失败: {0}")]
    SerializeFailed(String),
}

/// 文档组装错误
#[derive(Debug, Error)]
pub enum AssemblyError {
    /// 用于命名文件的列不存在
    #[error("列 '{column}' 不存在, 可选列: {}", available.join(", "))]
    MissingColumn {
        column: String,
        available: Vec<String>,
    },
    /// 模板读取失败
    #[error("读取模板失败 ({path}): {source}")]
    TemplateRead {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 压缩包写入失败
    #[error("写入压缩包失败 ({entry}): {source}")]
    Archive {
        entry: String,
        #[source]
        source: zip::result::ZipError,
    },
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 写入文件失败
    #[error("写入文件失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建文件写入错误
    pub fn write_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::File(FileError::WriteFailed {
            path: path.into(),
            source,
        })
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_column_lists_available_columns() {
        let err = AppError::from(AssemblyError::MissingColumn {
            column: "ItemId".to_string(),
            available: vec!["Codigo".into(), "Pregunta".into()],
        });
        let msg = err.to_string();
        assert!(msg.contains("'ItemId'"));
        assert!(msg.contains("Codigo, Pregunta"));
    }

    #[test]
    fn test_generation_error_keeps_cause() {
        let err = GenerationError::new("gemini-1.5-pro-latest", ProviderFault::EmptyCompletion);
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.to_string().contains("gemini-1.5-pro-latest"));
    }
}
