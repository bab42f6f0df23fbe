//! LLM interpretation of a finished scan
//!
//! Supports OpenAI-compatible APIs and Anthropic Claude. Interpretation
//! runs after scoring and only ever adds narrative text; the numbers
//! are fixed by then.

use std::sync::Arc;

use async_openai::{
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use thiserror::Error;

use veriscan_core::{Penalty, ScanResult, Signal, CRITICAL_POINTS};

/// Interpretation backend errors
#[derive(Debug, Error)]
pub enum InterpretError {
    #[error("API error: {0}")]
    Api(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Empty response")]
    EmptyResponse,
}

/// Generic interpretation backend trait
#[async_trait]
pub trait InterpreterBackend: Send + Sync {
    /// Generate a completion with system prompt
    async fn generate(&self, system: &str, user: &str) -> Result<String, InterpretError>;

    /// Get the model name
    fn model_name(&self) -> &str;
}

/// OpenAI-compatible backend configuration
#[derive(Debug, Clone)]
pub struct InterpreterConfig {
    /// API key
    pub api_key: String,
    /// Base URL (for OpenRouter, local servers, etc.)
    pub base_url: Option<String>,
    /// Model name
    pub model: String,
    /// Temperature (0.0 - 2.0)
    pub temperature: f32,
    /// Max tokens
    pub max_tokens: u16,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: None,
            model: "gpt-4o-mini".to_string(),
            temperature: 0.2,
            max_tokens: 1024,
        }
    }
}

impl InterpreterConfig {
    pub fn openai(api_key: &str, model: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            model: model.to_string(),
            ..Default::default()
        }
    }

    pub fn openrouter(api_key: &str, model: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            base_url: Some("https://openrouter.ai/api/v1".to_string()),
            model: model.to_string(),
            ..Default::default()
        }
    }

    pub fn local(base_url: &str, model: &str) -> Self {
        Self {
            api_key: "sk-local".to_string(),
            base_url: Some(base_url.to_string()),
            model: model.to_string(),
            ..Default::default()
        }
    }
}

/// OpenAI-compatible interpretation backend
pub struct OpenAIInterpreter {
    client: Client<OpenAIConfig>,
    config: InterpreterConfig,
}

impl OpenAIInterpreter {
    pub fn new(config: InterpreterConfig) -> Result<Self, InterpretError> {
        if config.api_key.is_empty() {
            return Err(InterpretError::Config("API key is required".to_string()));
        }

        let mut openai_config = OpenAIConfig::new().with_api_key(&config.api_key);

        if let Some(base_url) = &config.base_url {
            openai_config = openai_config.with_api_base(base_url);
        }

        let client = Client::with_config(openai_config);

        Ok(Self { client, config })
    }
}

#[async_trait]
impl InterpreterBackend for OpenAIInterpreter {
    async fn generate(&self, system: &str, user: &str) -> Result<String, InterpretError> {
        let messages = vec![
            ChatCompletionRequestMessage::System(
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(system)
                    .build()
                    .map_err(|e| InterpretError::Api(e.to_string()))?,
            ),
            ChatCompletionRequestMessage::User(
                ChatCompletionRequestUserMessageArgs::default()
                    .content(user)
                    .build()
                    .map_err(|e| InterpretError::Api(e.to_string()))?,
            ),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.config.model)
            .messages(messages)
            .temperature(self.config.temperature)
            .max_tokens(self.config.max_tokens)
            .build()
            .map_err(|e| InterpretError::Api(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| InterpretError::Api(e.to_string()))?;

        response
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .ok_or(InterpretError::EmptyResponse)
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

/// Anthropic Claude backend configuration
#[derive(Debug, Clone)]
pub struct AnthropicConfig {
    /// API key
    pub api_key: String,
    /// Model name (e.g., claude-3-5-sonnet-20241022)
    pub model: String,
    /// Max tokens
    pub max_tokens: u32,
}

impl AnthropicConfig {
    pub fn new(api_key: &str, model: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            model: model.to_string(),
            max_tokens: 1024,
        }
    }
}

/// Anthropic Claude interpretation backend
pub struct AnthropicInterpreter {
    client: reqwest::Client,
    config: AnthropicConfig,
}

impl AnthropicInterpreter {
    pub fn new(config: AnthropicConfig) -> Result<Self, InterpretError> {
        if config.api_key.is_empty() {
            return Err(InterpretError::Config("API key is required".to_string()));
        }

        let client = reqwest::Client::new();
        Ok(Self { client, config })
    }
}

#[async_trait]
impl InterpreterBackend for AnthropicInterpreter {
    async fn generate(&self, system: &str, user: &str) -> Result<String, InterpretError> {
        let request_body = serde_json::json!({
            "model": self.config.model,
            "max_tokens": self.config.max_tokens,
            "system": system,
            "messages": [
                {"role": "user", "content": user}
            ]
        });

        let response = self
            .client
            .post("https://api.anthropic.com/v1/messages")
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await
            .map_err(|e| InterpretError::Api(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(InterpretError::Api(format!(
                "Anthropic API error {}: {}",
                status, text
            )));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| InterpretError::Api(e.to_string()))?;

        json["content"]
            .as_array()
            .and_then(|arr| arr.first())
            .and_then(|block| block["text"].as_str())
            .map(|s| s.to_string())
            .ok_or(InterpretError::EmptyResponse)
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

/// Thread-safe reference to an interpretation backend
pub type SharedInterpreter = Arc<dyn InterpreterBackend>;

/// Create a shared OpenAI-compatible backend
pub fn create_interpreter(config: InterpreterConfig) -> Result<SharedInterpreter, InterpretError> {
    Ok(Arc::new(OpenAIInterpreter::new(config)?))
}

/// Create a shared Anthropic backend
pub fn create_anthropic_interpreter(
    config: AnthropicConfig,
) -> Result<SharedInterpreter, InterpretError> {
    Ok(Arc::new(AnthropicInterpreter::new(config)?))
}

/// System prompt for scan interpretation
const INTERPRETER_SYSTEM_PROMPT: &str = r#"
You are a private-equity due-diligence analyst reviewing an automated web-presence scan of a target company.

Rules:
1. Work only from the scan data provided; never invent facts about the company
2. Explain what the score and category coverage say about the company's verifiable footprint
3. Call out the most consequential gaps and what each would take to verify manually
4. Treat applied penalties as red flags worth a sentence each
5. Be direct and analytical; no marketing language
6. Write exactly three short paragraphs: presence posture, key gaps, recommended next checks

SCAN DATA:
"#;

/// Render the scored result as prompt input. Only applied penalties
/// and missing high-value signals make the cut; the model does not
/// need the full board.
fn build_prompt(result: &ScanResult) -> String {
    let mut prompt = String::new();

    prompt.push_str(&format!("Company: {}\n", result.company_name));
    prompt.push_str(&format!("Domain: {}\n", result.domain));
    prompt.push_str(&format!(
        "Score: {}/100 ({} coverage)\n\n",
        result.score,
        result.coverage_level.label()
    ));

    prompt.push_str("Category coverage:\n");
    for category in &result.categories {
        prompt.push_str(&format!(
            "- {}: {}/{}\n",
            category.name, category.score, category.max_score
        ));
    }

    let applied: Vec<&Penalty> = result.penalties.iter().filter(|p| p.applied).collect();
    if !applied.is_empty() {
        prompt.push_str("\nPenalties applied:\n");
        for penalty in applied {
            prompt.push_str(&format!("- {} ({})\n", penalty.name, penalty.points));
        }
    }

    let missing_critical: Vec<&Signal> = result
        .signals
        .iter()
        .filter(|s| !s.found && s.max_points >= CRITICAL_POINTS)
        .collect();
    if !missing_critical.is_empty() {
        prompt.push_str("\nMissing high-value signals:\n");
        for signal in missing_critical {
            prompt.push_str(&format!("- {} ({} pts)\n", signal.name, signal.max_points));
        }
    }

    prompt.push_str(&format!(
        "\nVerification effort: {}\n",
        result.effort.level.label()
    ));
    for reason in &result.effort.reasons {
        prompt.push_str(&format!("- {}\n", reason));
    }

    prompt
}

/// Generate an analyst brief for a scored result.
pub async fn interpret_result(
    backend: &dyn InterpreterBackend,
    result: &ScanResult,
) -> Result<String, InterpretError> {
    let prompt = build_prompt(result);
    backend.generate(INTERPRETER_SYSTEM_PROMPT, &prompt).await
}
