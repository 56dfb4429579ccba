//! Chat completion client for the chatbot panel
//!
//! One blocking POST per question: a fixed system prompt plus
//! `"{question} about {object}"`. No history, no retries, no streaming.
//! Callers run it off the UI thread.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::config::chat::*;

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("chat endpoint is not configured (set {0})")]
    NotConfigured(&'static str),
    #[error("select an object and enter a question first")]
    EmptyRequest,
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{0}")]
    Api(String),
    #[error("chatbot unavailable: {0}")]
    Unavailable(String),
}

/// Endpoint and key for the completion service
#[derive(Clone)]
pub struct ChatConfig {
    pub endpoint: String,
    pub api_key: String,
}

impl ChatConfig {
    pub fn from_env() -> Result<Self, ChatError> {
        let endpoint = read_env(ENDPOINT_ENV)?;
        let api_key = read_env(API_KEY_ENV)?;
        Ok(Self { endpoint, api_key })
    }
}

fn read_env(name: &'static str) -> Result<String, ChatError> {
    std::env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or(ChatError::NotConfigured(name))
}

// =============================================================================
// Wire format
// =============================================================================

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChatMessage {
    pub role: &'static str,
    pub content: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompletionRequest {
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
    pub frequency_penalty: f32,
    pub presence_penalty: f32,
}

impl CompletionRequest {
    pub fn about(object: &str, question: &str) -> Self {
        Self {
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: format!("{question} about {object}"),
                },
            ],
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
            top_p: TOP_P,
            frequency_penalty: FREQUENCY_PENALTY,
            presence_penalty: PRESENCE_PENALTY,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ResponseMessage>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

impl CompletionResponse {
    /// `choices[0].message.content`, verbatim
    pub fn reply(&self) -> String {
        self.choices
            .first()
            .and_then(|c| c.message.as_ref())
            .and_then(|m| m.content.clone())
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| "No response".to_string())
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: Option<ApiErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: Option<String>,
}

/// `error.message` from a failed response body, or a generic message
pub fn api_error_message(body: &str) -> String {
    serde_json::from_str::<ApiErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .and_then(|e| e.message)
        .unwrap_or_else(|| "API Error".to_string())
}

// =============================================================================
// Client
// =============================================================================

/// One question and its answer
#[derive(Debug, Clone, Serialize)]
pub struct ChatExchange {
    pub selected_object: String,
    pub question: String,
    pub response: String,
}

pub struct ChatClient {
    http: reqwest::blocking::Client,
    config: ChatConfig,
}

impl ChatClient {
    pub fn new(config: ChatConfig) -> Result<Self, ChatError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self { http, config })
    }

    pub fn from_env() -> Result<Self, ChatError> {
        Self::new(ChatConfig::from_env()?)
    }

    pub fn ask(&self, object: &str, question: &str) -> Result<ChatExchange, ChatError> {
        let (object, question) = (object.trim(), question.trim());
        if object.is_empty() || question.is_empty() {
            return Err(ChatError::EmptyRequest);
        }

        log::info!("[Chat] Asking about {}", object);
        let response = self
            .http
            .post(&self.config.endpoint)
            .header("Content-Type", "application/json")
            .header("api-key", &self.config.api_key)
            .json(&CompletionRequest::about(object, question))
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            log::warn!("[Chat] Endpoint returned {}", status);
            return Err(ChatError::Api(api_error_message(&body)));
        }

        let completion: CompletionResponse = response.json()?;
        Ok(ChatExchange {
            selected_object: object.to_string(),
            question: question.to_string(),
            response: completion.reply(),
        })
    }
}

/// The chat client shared by every question
///
/// Built once at startup. When that fails (usually a missing configuration)
/// the reason is kept and returned for each question.
#[derive(Clone)]
pub struct SharedChatClient(Arc<Result<ChatClient, String>>);

impl SharedChatClient {
    pub fn new(client: Result<ChatClient, ChatError>) -> Self {
        if let Err(err) = &client {
            log::warn!("[Chat] Chatbot disabled: {}", err);
        }
        Self(Arc::new(client.map_err(|e| e.to_string())))
    }

    pub fn from_env() -> Self {
        Self::new(ChatClient::from_env())
    }

    pub fn ask(&self, object: &str, question: &str) -> Result<ChatExchange, ChatError> {
        match self.0.as_ref() {
            Ok(client) => client.ask(object, question),
            Err(reason) => Err(ChatError::Unavailable(reason.clone())),
        }
    }
}
