use crate::{
    constants::{ASK_PATH, HEALTH_PATH},
    errors::{ChatError, ChatResult},
    logging::log_api_call,
    models::{ApiCallLog, AskRequest, AskResponse},
};
use chrono::Utc;
use reqwest::{Client, Url};
use std::time::Instant;

/// HTTP client for the answer service.
///
/// Cheap to clone; each in-flight request task gets its own copy.
#[derive(Debug, Clone)]
pub struct AnswerClient {
    client: Client,
    base_url: Url,
}

impl AnswerClient {
    /// `base_url` must end with `/` (see [`crate::config::parse_base_url`]).
    pub fn new(base_url: Url) -> Self {
        Self {
            client: Client::new(),
            base_url,
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> ChatResult<Url> {
        self.base_url
            .join(path)
            .map_err(|e| ChatError::config_error(format!("Invalid endpoint '{}': {}", path, e)))
    }

    /// Sends `question` verbatim to `POST /ask` and returns the `answer` field.
    pub async fn ask(&self, question: &str) -> ChatResult<String> {
        let url = self.endpoint(ASK_PATH)?;
        log::debug!("POST {} ({} chars)", url, question.len());

        let start_time = Instant::now();
        let response = self
            .client
            .post(url.clone())
            .json(&AskRequest { question })
            .send()
            .await?;

        let status = response.status();
        log_api_call(&ApiCallLog {
            timestamp: Utc::now(),
            endpoint: url.to_string(),
            request_summary: format!("ask ({} chars)", question.len()),
            response_status: status.as_u16(),
            response_time_ms: start_time.elapsed().as_millis(),
        });

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ChatError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        let parsed: AskResponse = serde_json::from_str(&body)
            .map_err(|e| ChatError::malformed(format!("{} in body {:?}", e, truncate(&body, 200))))?;

        Ok(parsed.answer)
    }

    /// Probes `GET /health`. Any 2xx counts as healthy.
    pub async fn health(&self) -> ChatResult<()> {
        let url = self.endpoint(HEALTH_PATH)?;
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(ChatError::Status {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            })
        }
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        let cut: String = text.chars().take(max_chars).collect();
        format!("{}...", cut)
    } else {
        text.to_string()
    }
}
