//! Chat-completions insight backend.
//!
//! Works with any server implementing the OpenAI `/v1/chat/completions`
//! API; the hosted Groq endpoint is the default. The backend makes one
//! request per call and reports every failure as an error so the caller
//! can fall back to the deterministic rule set.

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::FinSageError;
use crate::models::anomaly::Recommendation;

use super::parsing::parse_recommendations;
use super::{InsightRequest, InsightService};

#[derive(Clone)]
pub struct GroqInsightBackend {
    http_client: Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f64,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}

impl GroqInsightBackend {
    pub fn new(base_url: &str, model: &str) -> Self {
        Self {
            http_client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: None,
        }
    }

    pub fn with_api_key(base_url: &str, model: &str, api_key: &str) -> Self {
        Self {
            api_key: Some(api_key.to_string()),
            ..Self::new(base_url, model)
        }
    }

    /// Build a backend from runtime configuration. Returns None when no
    /// API key is configured; the caller runs on the rule fallback alone.
    pub fn from_config(config: &Config) -> Option<Self> {
        let api_key = config.insight_api_key.as_deref()?;
        Some(Self::with_api_key(
            &config.insight_host,
            &config.insight_model,
            api_key,
        ))
    }

    fn build_prompt(request: &InsightRequest) -> String {
        format!(
            "You are a practical personal finance advisor. Analyse this month's spending and give specific, actionable recommendations.\n\
             \n\
             Monthly Income: {:.2}\n\
             Monthly Expense Limit: {:.2}\n\
             Target Savings: {:.2}\n\
             Total Expenses This Month: {:.2}\n\
             \n\
             Budget Allocations:\n{}\n\
             \n\
             Current Month Expenses by Category:\n{}\n\
             \n\
             Last Month Expenses by Category:\n{}\n\
             \n\
             Rules for your response:\n\
             1. For each category that exceeded its allocation, give one specific tip to reduce that category's spending.\n\
             2. Include 1-2 general positive recommendations (savings, investment).\n\
             3. Each recommendation must have: category (string), message (specific actionable tip), type (\"warning\"/\"success\"/\"info\").\n\
             4. Return ONLY a valid JSON array, no markdown, no explanation.",
            request.monthly_income,
            request.monthly_limit,
            request.target_savings,
            request.total_expenses,
            serde_json::to_string_pretty(&request.allocated_by_category).unwrap_or_default(),
            serde_json::to_string_pretty(&request.current_by_category).unwrap_or_default(),
            serde_json::to_string_pretty(&request.last_month_by_category).unwrap_or_default(),
        )
    }

    async fn chat_completion(&self, prompt: &str) -> Result<String, FinSageError> {
        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: "You are a practical personal finance advisor. Always return valid JSON only.".to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: prompt.to_string(),
                },
            ],
            temperature: 0.4,
            max_tokens: 1500,
        };

        let mut req_builder = self
            .http_client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .json(&request);

        if let Some(ref api_key) = self.api_key {
            req_builder = req_builder.header("Authorization", format!("Bearer {}", api_key));
        }

        let response = req_builder
            .send()
            .await
            .map_err(|e| FinSageError::InsightServiceError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(FinSageError::InsightServiceError(format!(
                "Insight API error {}: {}",
                status, body
            )));
        }

        let chat_response: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| FinSageError::InsightServiceError(e.to_string()))?;

        chat_response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| {
                FinSageError::MalformedInsightResponse("No choices in insight API response".into())
            })
    }
}

#[async_trait]
impl InsightService for GroqInsightBackend {
    async fn recommend(
        &self,
        request: &InsightRequest,
    ) -> Result<Vec<Recommendation>, FinSageError> {
        let prompt = Self::build_prompt(request);
        debug!(
            "Requesting insight recommendations from {} ({})",
            self.base_url, self.model
        );
        let response = self.chat_completion(&prompt).await?;
        parse_recommendations(&response)
    }

    async fn health_check(&self) -> bool {
        self.http_client
            .get(format!("{}/v1/models", self.base_url))
            .send()
            .await
            .map(|r| r.status().is_success())
            .unwrap_or(false)
    }

    fn model(&self) -> &str {
        &self.model
    }
}
