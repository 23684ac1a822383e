//! OpenAI-compatible adapter for report generation.
//!
//! Defaults to Gemini's OpenAI-compatible endpoint, but any chat-completions API works.
//! Implements `ReportGenerator` with schema-constrained JSON output and markdown stripping.

use super::csv_utils::contacts_to_csv;
use super::prompts;
use super::wire::WireReport;
use crate::domain::{
    Contact, CrmReport, DailyBriefing, DomainError, JournalAnalysis, MoonPhase, ReportSubject,
    SynergyReport,
};
use crate::ports::ReportGenerator;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

/// OpenAI-compatible report generator.
///
/// Can be configured to work with:
/// - Gemini (OpenAI-compatible endpoint)
/// - OpenAI API
/// - Ollama or any other OpenAI-compatible API
pub struct OpenAiAdapter {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
    /// Cheaper model for short free-text answers.
    fast_model: String,
}

impl OpenAiAdapter {
    /// Create a new adapter.
    ///
    /// # Arguments
    /// * `api_url` - chat completions endpoint
    /// * `api_key` - API key (can be empty for local Ollama)
    /// * `model` - model for structured reports (e.g. "gemini-2.5-pro")
    /// * `fast_model` - model for short insights (e.g. "gemini-2.5-flash")
    /// * `timeout` - per-request timeout
    pub fn new(
        api_url: String,
        api_key: String,
        model: String,
        fast_model: String,
        timeout: Duration,
    ) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DomainError::Ai(format!("HTTP client setup failed: {}", e)))?;
        Ok(Self {
            client,
            api_url,
            api_key,
            model,
            fast_model,
        })
    }

    /// Sanitize JSON response from LLM.
    ///
    /// LLMs sometimes wrap JSON in markdown code blocks. This strips them.
    fn sanitize_json(raw_text: &str) -> String {
        let trimmed = raw_text.trim();

        // ```json ... ``` or ``` ... ```
        if trimmed.starts_with("```") {
            let without_prefix = trimmed
                .strip_prefix("```json")
                .or_else(|| trimmed.strip_prefix("```"))
                .unwrap_or(trimmed);

            if let Some(end_idx) = without_prefix.rfind("```") {
                return without_prefix[..end_idx].trim().to_string();
            }
            return without_prefix.trim().to_string();
        }

        // Leading/trailing prose around a JSON object
        if let (Some(start), Some(end)) = (trimmed.find('{'), trimmed.rfind('}')) {
            if start < end {
                return trimmed[start..=end].to_string();
            }
        }

        trimmed.to_string()
    }

    fn parse_json<T: DeserializeOwned>(raw: &str) -> Result<T, DomainError> {
        let clean_json = Self::sanitize_json(raw);
        serde_json::from_str(&clean_json).map_err(|e| {
            warn!(error = %e, json = %clean_json.chars().take(200).collect::<String>(), "JSON parse failed");
            DomainError::Ai(format!("Failed to parse LLM JSON: {}", e))
        })
    }

    /// Send one chat completion and return the first choice's content.
    async fn complete(&self, request: &ChatRequest) -> Result<String, DomainError> {
        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| DomainError::Ai(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %text, "AI API returned error");
            return Err(DomainError::Ai(format!(
                "API error {}: {}",
                status,
                text.chars().take(200).collect::<String>()
            )));
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| DomainError::Ai(format!("Failed to parse API response: {}", e)))?;

        let content = chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| DomainError::Ai("No response choices returned".to_string()))?;

        debug!(model = %request.model, raw_len = content.len(), "received AI response");
        Ok(content)
    }

    /// Structured request: prompt plus a named JSON schema.
    async fn complete_json<T: DeserializeOwned>(
        &self,
        schema_name: &str,
        schema: serde_json::Value,
        prompt: String,
    ) -> Result<T, DomainError> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage::user(prompt)],
            temperature: 0.3,
            response_format: Some(ResponseFormat {
                format_type: "json_schema".to_string(),
                json_schema: Some(prompts::named_schema(schema_name, schema)),
            }),
        };
        let raw = self.complete(&request).await?;
        Self::parse_json(&raw)
    }
}

/// OpenAI API request structure.
#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

impl ChatMessage {
    fn user(content: String) -> Self {
        Self {
            role: "user".to_string(),
            content,
        }
    }
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    json_schema: Option<serde_json::Value>,
}

/// OpenAI API response structure.
#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: MessageContent,
}

#[derive(Deserialize)]
struct MessageContent {
    content: Option<String>,
}

#[async_trait::async_trait]
impl ReportGenerator for OpenAiAdapter {
    async fn generate_report(&self, subject: &ReportSubject) -> Result<CrmReport, DomainError> {
        info!(
            name = %subject.name,
            personal_year = ?subject.personal_year,
            model = %self.model,
            "requesting profile report"
        );
        let wire: WireReport = self
            .complete_json(
                "crm_report",
                prompts::report_schema(),
                prompts::report_prompt(subject),
            )
            .await?;
        let report = CrmReport::from(wire);
        info!(
            name = %subject.name,
            sections = report.sections.len(),
            "profile report complete"
        );
        Ok(report)
    }

    async fn generate_synergy(&self, contacts: &[Contact]) -> Result<SynergyReport, DomainError> {
        let group_csv =
            contacts_to_csv(contacts).map_err(|e| DomainError::Ai(format!("CSV context: {}", e)))?;
        info!(
            members = contacts.len(),
            csv_len = group_csv.len(),
            "requesting synergy report"
        );
        let report: SynergyReport = self
            .complete_json(
                "synergy_report",
                prompts::synergy_schema(),
                prompts::synergy_prompt(&group_csv),
            )
            .await?;
        info!(pairs = report.pairwise_analyses.len(), "synergy report complete");
        Ok(report)
    }

    async fn daily_briefing(&self, report: &CrmReport) -> Result<DailyBriefing, DomainError> {
        let report_json = serde_json::to_string_pretty(report)
            .map_err(|e| DomainError::Ai(format!("serialize report: {}", e)))?;
        self.complete_json(
            "daily_briefing",
            prompts::daily_briefing_schema(),
            prompts::daily_briefing_prompt(&report_json),
        )
        .await
    }

    async fn analyze_journal(&self, content: &str) -> Result<JournalAnalysis, DomainError> {
        info!(entry_len = content.len(), "requesting journal analysis");
        self.complete_json(
            "journal_analysis",
            prompts::journal_schema(),
            prompts::journal_prompt(content),
        )
        .await
    }

    async fn lunar_insight(&self, phase: MoonPhase) -> Result<String, DomainError> {
        let request = ChatRequest {
            model: self.fast_model.clone(),
            messages: vec![ChatMessage::user(prompts::lunar_prompt(phase))],
            temperature: 0.7,
            response_format: None, // Plain text
        };
        let insight = self.complete(&request).await?.trim().to_string();
        info!(phase = %phase, insight_len = insight.len(), "lunar insight complete");
        Ok(insight)
    }
}
