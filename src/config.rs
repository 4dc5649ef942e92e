use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 文本生成服务提供方
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// Google Gemini `generateContent` 接口
    Gemini,
    /// 兼容 OpenAI chat completions 的服务
    #[serde(alias = "openai-compatible")]
    Openai,
}

impl std::str::FromStr for Provider {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" => Ok(Provider::Gemini),
            "openai" | "openai-compatible" => Ok(Provider::Openai),
            other => Err(ConfigError::InvalidValue {
                field: "provider".to_string(),
                value: other.to_string(),
                expected: "gemini | openai".to_string(),
            }),
        }
    }
}

/// 程序配置文件
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // --- 生成服务配置 ---
    pub provider: Provider,
    pub api_base_url: String,
    pub model_name: String,
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub max_output_tokens: u32,
    /// 四类安全策略统一使用的拦截阈值
    pub safety_threshold: String,
    /// 单次调用超时（秒）
    pub request_timeout_secs: u64,
    /// 两次调用之间的固定间隔（毫秒）
    pub request_delay_ms: u64,
    /// 同时处理的行数，1 表示严格串行
    pub max_concurrent_rows: usize,
    // --- 输入输出 ---
    /// 用于命名文档的列
    pub id_column: String,
    /// 增强后表格的输出路径
    pub output_table_path: String,
    /// 文档压缩包输出路径
    pub archive_path: String,
    /// 运行日志（记录失败行）
    pub run_log_file: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provider: Provider::Gemini,
            api_base_url: "https://generativelanguage.googleapis.com".to_string(),
            model_name: "gemini-1.5-pro-latest".to_string(),
            temperature: 0.6,
            top_p: 1.0,
            top_k: 1,
            max_output_tokens: 8192,
            safety_threshold: "BLOCK_MEDIUM_AND_ABOVE".to_string(),
            request_timeout_secs: 120,
            request_delay_ms: 1000,
            max_concurrent_rows: 1,
            id_column: "ItemId".to_string(),
            output_table_path: "excel_enriquecido_con_ia.json".to_string(),
            archive_path: "fichas_tecnicas_generadas.zip".to_string(),
            run_log_file: "registro_enriquecimiento.txt".to_string(),
            verbose_logging: false,
        }
    }
}

impl Config {
    /// 从 TOML 文件加载配置，缺省字段使用默认值
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::FileParse {
            path: path.display().to_string(),
            source,
        })
    }

    /// 用环境变量覆盖已有配置
    pub fn apply_env(self) -> Result<Self, ConfigError> {
        let provider = match std::env::var("LLM_PROVIDER") {
            Ok(v) => v.parse()?,
            Err(_) => self.provider,
        };
        Ok(Self {
            provider,
            api_base_url: std::env::var("LLM_API_BASE_URL").unwrap_or(self.api_base_url),
            model_name: std::env::var("LLM_MODEL_NAME").unwrap_or(self.model_name),
            temperature: env_parse("LLM_TEMPERATURE", self.temperature)?,
            top_p: self.top_p,
            top_k: self.top_k,
            max_output_tokens: env_parse("LLM_MAX_OUTPUT_TOKENS", self.max_output_tokens)?,
            safety_threshold: std::env::var("LLM_SAFETY_THRESHOLD").unwrap_or(self.safety_threshold),
            request_timeout_secs: env_parse("REQUEST_TIMEOUT_SECS", self.request_timeout_secs)?,
            request_delay_ms: env_parse("REQUEST_DELAY_MS", self.request_delay_ms)?,
            max_concurrent_rows: env_parse("MAX_CONCURRENT_ROWS", self.max_concurrent_rows)?,
            id_column: std::env::var("ID_COLUMN").unwrap_or(self.id_column),
            output_table_path: std::env::var("OUTPUT_TABLE_PATH").unwrap_or(self.output_table_path),
            archive_path: std::env::var("ARCHIVE_PATH").unwrap_or(self.archive_path),
            run_log_file: std::env::var("RUN_LOG_FILE").unwrap_or(self.run_log_file),
            verbose_logging: env_parse("VERBOSE_LOGGING", self.verbose_logging)?,
        })
    }

    /// 校验取值范围
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_concurrent_rows == 0 {
            return Err(invalid("max_concurrent_rows", "0", "大于 0 的整数"));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(invalid(
                "temperature",
                &self.temperature.to_string(),
                "0.0 ~ 2.0",
            ));
        }
        if self.id_column.trim().is_empty() {
            return Err(invalid("id_column", "", "非空列名"));
        }
        Ok(())
    }
}

fn env_parse<T: std::str::FromStr>(var_name: &str, fallback: T) -> Result<T, ConfigError> {
    match std::env::var(var_name) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| invalid(var_name, &value, std::any::type_name::<T>())),
        Err(_) => Ok(fallback),
    }
}

fn invalid(field: &str, value: &str, expected: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        expected: expected.to_string(),
    }
}
