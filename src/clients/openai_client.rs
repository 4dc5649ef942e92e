//! 兼容 OpenAI 接口的生成客户端
//!
//! ## 技术栈
//! - 使用 `async-openai` crate 进行 API 调用
//! - 支持自定义 API 端点和模型（Azure、Gemini 的 OpenAI 兼容端点、本地推理服务等）
//! - 该接口没有按类别的安全阈值，`safety_settings` 与 `top_k` 不会发送
//! - 超时由 `async-openai` 内置的 HTTP 客户端决定，不读取 `request_timeout`

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use tracing::{debug, warn};

use crate::clients::{Credential, GenerationSettings, TextGenerator};
use crate::error::{ConfigError, GenerationError, ProviderFault};

/// OpenAI 兼容客户端
pub struct OpenAiCompatClient {
    client: Client<OpenAIConfig>,
    settings: GenerationSettings,
}

impl OpenAiCompatClient {
    /// 创建新的客户端
    pub fn configure(credential: &Credential, settings: GenerationSettings) -> Result<Self, ConfigError> {
        let openai_config = OpenAIConfig::new()
            .with_api_key(credential.expose())
            .with_api_base(&settings.api_base_url);

        let client = Client::with_config(openai_config);

        debug!(
            "OpenAI 兼容客户端不支持安全阈值，忽略 {} 项安全策略",
            settings.safety_settings.len()
        );

        Ok(Self { client, settings })
    }
}

#[async_trait]
impl TextGenerator for OpenAiCompatClient {
    async fn complete(&self, prompt: &str) -> Result<String, GenerationError> {
        let model = &self.settings.model_name;
        debug!("调用 LLM API，模型: {}", model);
        debug!("用户消息长度: {} 字符", prompt.chars().count());

        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(prompt)
            .build()
            .map_err(|e| GenerationError::new(model, e))?;

        let request = CreateChatCompletionRequestArgs::default()
            .model(model)
            .messages(vec![ChatCompletionRequestMessage::User(user_msg)])
            .temperature(self.settings.temperature)
            .top_p(self.settings.top_p)
            .max_tokens(self.settings.max_output_tokens)
            .build()
            .map_err(|e| GenerationError::new(model, e))?;

        let response = self.client.chat().create(request).await.map_err(|e| {
            warn!("LLM API 调用失败: {}", e);
            GenerationError::new(model, e)
        })?;

        debug!("LLM API 调用成功");

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| GenerationError::new(model, ProviderFault::EmptyCompletion))?;

        Ok(content.trim().to_string())
    }

    fn model_name(&self) -> &str {
        &self.settings.model_name
    }
}
