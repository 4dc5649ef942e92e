/// Gemini API 客户端
///
/// 调用 `generateContent` 接口，携带固定的生成参数和安全策略
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::clients::{Credential, GenerationSettings, TextGenerator};
use crate::error::{ConfigError, GenerationError, ProviderFault};

/// Gemini 客户端
#[derive(Debug)]
pub struct GeminiClient {
    api_key: Credential,
    settings: GenerationSettings,
    http: reqwest::Client,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
    safety_settings: Vec<SafetySettingBody<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<PartBody<'a>>,
}

#[derive(Debug, Serialize)]
struct PartBody<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_p: f32,
    top_k: u32,
    max_output_tokens: u32,
}

#[derive(Debug, Serialize)]
struct SafetySettingBody<'a> {
    category: &'a str,
    threshold: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

impl GeminiClient {
    /// 创建客户端
    ///
    /// # 参数
    /// - `credential`: API 密钥
    /// - `settings`: 整次运行固定的生成参数
    pub fn configure(credential: &Credential, settings: GenerationSettings) -> Result<Self, ConfigError> {
        reqwest::header::HeaderValue::from_str(credential.expose()).map_err(|e| {
            ConfigError::InvalidCredential {
                reason: e.to_string(),
            }
        })?;

        let http = reqwest::Client::builder()
            .timeout(settings.request_timeout)
            .build()
            .map_err(ConfigError::HttpClient)?;

        Ok(Self {
            api_key: credential.clone(),
            settings,
            http,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.settings.api_base_url, self.settings.model_name
        )
    }

    fn build_request<'a>(&'a self, prompt: &'a str) -> GenerateRequest<'a> {
        GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![PartBody { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: self.settings.temperature,
                top_p: self.settings.top_p,
                top_k: self.settings.top_k,
                max_output_tokens: self.settings.max_output_tokens,
            },
            safety_settings: self
                .settings
                .safety_settings
                .iter()
                .map(|s| SafetySettingBody {
                    category: &s.category,
                    threshold: &s.threshold,
                })
                .collect(),
        }
    }

    fn failure(&self, cause: impl Into<crate::error::BoxError>) -> GenerationError {
        GenerationError::new(&self.settings.model_name, cause)
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn complete(&self, prompt: &str) -> Result<String, GenerationError> {
        debug!("调用 Gemini API，模型: {}", self.settings.model_name);
        debug!("提示词长度: {} 字符", prompt.chars().count());

        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", self.api_key.expose())
            .json(&self.build_request(prompt))
            .send()
            .await
            .map_err(|e| {
                warn!("Gemini API 调用失败: {}", e);
                self.failure(e)
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.failure(e))?;

        if !status.is_success() {
            return Err(self.failure(ProviderFault::BadStatus {
                status: status.as_u16(),
                body,
            }));
        }

        let parsed: GenerateResponse = serde_json::from_str(&body)
            .map_err(|e| self.failure(ProviderFault::InvalidResponse(e.to_string())))?;

        extract_text(parsed).map_err(|fault| self.failure(fault))
    }

    fn model_name(&self) -> &str {
        &self.settings.model_name
    }
}

/// 从响应中取出第一个候选的全部文本
fn extract_text(response: GenerateResponse) -> Result<String, ProviderFault> {
    if let Some(reason) = response.prompt_feedback.and_then(|f| f.block_reason) {
        return Err(ProviderFault::Blocked { reason });
    }

    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or(ProviderFault::EmptyCompletion)?;

    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(match candidate.finish_reason.as_deref() {
            Some("SAFETY") => ProviderFault::Blocked {
                reason: "SAFETY".to_string(),
            },
            _ => ProviderFault::EmptyCompletion,
        });
    }

    Ok(text.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn client() -> GeminiClient {
        let settings = GenerationSettings::from_config(&Config::default());
        GeminiClient::configure(&Credential::new("test-key").unwrap(), settings).unwrap()
    }

    #[test]
    fn test_request_body_carries_fixed_settings() {
        let client = client();
        let body = serde_json::to_value(client.build_request("hola")).unwrap();

        assert_eq!(body["contents"][0]["parts"][0]["text"], "hola");
        assert_eq!(body["generationConfig"]["topK"], 1);
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 8192);
        assert_eq!(body["safetySettings"].as_array().unwrap().len(), 4);
        assert_eq!(body["safetySettings"][0]["threshold"], "BLOCK_MEDIUM_AND_ABOVE");
    }

    #[test]
    fn test_endpoint() {
        assert_eq!(
            client().endpoint(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-pro-latest:generateContent"
        );
    }

    #[test]
    fn test_extract_joins_parts_and_trims() {
        let response: GenerateResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"  Qué Evalúa:\n"},{"text":"Suma. "}]},"finishReason":"STOP"}]}"#,
        )
        .unwrap();
        assert_eq!(extract_text(response).unwrap(), "Qué Evalúa:\nSuma.");
    }

    #[test]
    fn test_extract_reports_block() {
        let blocked: GenerateResponse =
            serde_json::from_str(r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#).unwrap();
        assert!(matches!(extract_text(blocked), Err(ProviderFault::Blocked { .. })));

        let safety_stop: GenerateResponse =
            serde_json::from_str(r#"{"candidates":[{"finishReason":"SAFETY"}]}"#).unwrap();
        assert!(matches!(extract_text(safety_stop), Err(ProviderFault::Blocked { .. })));

        let empty: GenerateResponse = serde_json::from_str(r#"{"candidates":[]}"#).unwrap();
        assert!(matches!(extract_text(empty), Err(ProviderFault::EmptyCompletion)));
    }
}
