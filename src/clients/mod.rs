//! 文本生成客户端 - 基础设施层
//!
//! 只暴露"给定提示词，返回文本"这一能力，不认识题目和表格。
//! 所有生成参数在配置时固定，调用时不可调整。

pub mod gemini_client;
pub mod openai_client;

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;

use crate::config::{Config, Provider};
use crate::error::{ConfigError, GenerationError};

pub use gemini_client::GeminiClient;
pub use openai_client::OpenAiCompatClient;

/// 文本生成能力
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// 发送提示词，返回去掉首尾空白的完整文本
    ///
    /// 单次阻塞往返，没有流式输出。调用方负责限速。
    async fn complete(&self, prompt: &str) -> Result<String, GenerationError>;

    /// 模型名称（用于日志）
    fn model_name(&self) -> &str;
}

/// 安全策略类别
pub const HARM_CATEGORIES: [&str; 4] = [
    "HARM_CATEGORY_HARASSMENT",
    "HARM_CATEGORY_HATE_SPEECH",
    "HARM_CATEGORY_SEXUALLY_EXPLICIT",
    "HARM_CATEGORY_DANGEROUS_CONTENT",
];

/// 单个类别的拦截阈值
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SafetySetting {
    pub category: String,
    pub threshold: String,
}

/// 整次运行固定的生成参数
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSettings {
    pub api_base_url: String,
    pub model_name: String,
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub max_output_tokens: u32,
    pub safety_settings: Vec<SafetySetting>,
    pub request_timeout: Duration,
}

impl GenerationSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
            model_name: config.model_name.clone(),
            temperature: config.temperature,
            top_p: config.top_p,
            top_k: config.top_k,
            max_output_tokens: config.max_output_tokens,
            safety_settings: HARM_CATEGORIES
                .iter()
                .map(|category| SafetySetting {
                    category: category.to_string(),
                    threshold: config.safety_threshold.clone(),
                })
                .collect(),
            request_timeout: Duration::from_secs(config.request_timeout_secs),
        }
    }
}

/// API 密钥
///
/// 只在内存中保存，`Debug` 输出会被遮蔽。
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// 校验并创建密钥
    pub fn new(secret: impl Into<String>) -> Result<Self, ConfigError> {
        let secret = secret.into().trim().to_string();
        if secret.is_empty() {
            return Err(ConfigError::InvalidCredential {
                reason: "密钥为空".to_string(),
            });
        }
        if !secret.chars().all(|c| c.is_ascii_graphic()) {
            return Err(ConfigError::InvalidCredential {
                reason: "密钥只能包含可见 ASCII 字符".to_string(),
            });
        }
        Ok(Self(secret))
    }

    /// 从命令行参数或环境变量获取密钥
    ///
    /// 查找顺序：显式传入 → `GEMINI_API_KEY` → `LLM_API_KEY`
    pub fn resolve(explicit: Option<&str>) -> Result<Self, ConfigError> {
        let secret = explicit
            .map(str::to_string)
            .or_else(|| std::env::var("GEMINI_API_KEY").ok())
            .or_else(|| std::env::var("LLM_API_KEY").ok())
            .ok_or_else(|| ConfigError::MissingCredential {
                env_hint: "GEMINI_API_KEY / LLM_API_KEY".to_string(),
            })?;
        Self::new(secret)
    }

    pub(crate) fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// 按配置创建生成客户端
///
/// 密钥无效时在发送任何提示词之前失败。
pub fn configure(config: &Config, credential: &Credential) -> Result<Box<dyn TextGenerator>, ConfigError> {
    let settings = GenerationSettings::from_config(config);
    let client: Box<dyn TextGenerator> = match config.provider {
        Provider::Gemini => Box::new(GeminiClient::configure(credential, settings)?),
        Provider::Openai => Box::new(OpenAiCompatClient::configure(credential, settings)?),
    };
    tracing::info!("✓ 生成客户端已就绪: {:?} / {}", config.provider, client.model_name());
    Ok(client)
}
