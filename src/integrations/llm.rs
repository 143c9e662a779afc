// src/integrations/llm.rs
//! OpenAI-compatible chat completions client
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::app_log;
use crate::core::ServiceClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat<'a>>,
}

#[derive(Debug, Serialize)]
struct ResponseFormat<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    json_schema: JsonSchemaSpec<'a>,
}

#[derive(Debug, Serialize)]
struct JsonSchemaSpec<'a> {
    name: &'a str,
    strict: bool,
    schema: &'a Value,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Clone)]
pub struct LlmClient {
    http: ServiceClient,
    api_key: String,
    model: String,
}

impl LlmClient {
    /// `api_url` is the full chat completions endpoint
    pub fn new(api_url: String, api_key: &str, model: String, timeout_seconds: u64) -> Result<Self> {
        Ok(Self {
            http: ServiceClient::new(api_url, timeout_seconds, &[])?,
            api_key: api_key.to_string(),
            model,
        })
    }

    /// Plain text completion
    pub async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
        self.send(messages, None).await
    }

    /// Completion constrained to a JSON schema, decoded into `T`
    pub async fn complete_json<T>(
        &self,
        messages: &[ChatMessage],
        schema_name: &str,
        schema: &Value,
    ) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let format = ResponseFormat {
            kind: "json_schema",
            json_schema: JsonSchemaSpec {
                name: schema_name,
                strict: true,
                schema,
            },
        };
        let content = self.send(messages, Some(format)).await?;
        serde_json::from_str(&content)
            .with_context(|| format!("LLM returned invalid {} JSON", schema_name))
    }

    async fn send(
        &self,
        messages: &[ChatMessage],
        response_format: Option<ResponseFormat<'_>>,
    ) -> Result<String> {
        let request = CompletionRequest {
            model: &self.model,
            messages,
            response_format,
        };

        app_log!(info, "Sending {} messages to LLM ({})", messages.len(), self.model);

        let response: CompletionResponse = self
            .http
            .post_json("", &request, Some(&self.api_key))
            .await
            .context("LLM completion request failed")?;

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| anyhow::anyhow!("LLM response contained no content"))?;

        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn completion(content: &str) -> String {
        json!({"choices": [{"message": {"role": "assistant", "content": content}}]}).to_string()
    }

    /// Expect the bearer key and model to be sent and the first choice returned
    #[tokio::test]
    async fn test_complete_returns_first_choice() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/")
            .match_header("authorization", "Bearer sk-test")
            .match_body(mockito::Matcher::PartialJson(json!({"model": "gpt-test"})))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(completion("Hello there"))
            .create_async()
            .await;

        let client = LlmClient::new(server.url(), "sk-test", "gpt-test".into(), 5).unwrap();
        let reply = client.complete(&[ChatMessage::user("hi")]).await.unwrap();

        assert_eq!(reply, "Hello there");
        mock.assert_async().await;
    }

    /// Expect schema-constrained output to be decoded into the target type
    #[tokio::test]
    async fn test_complete_json_decodes_content() {
        #[derive(Deserialize)]
        struct Answer {
            value: i64,
        }

        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/")
            .match_body(mockito::Matcher::PartialJson(
                json!({"response_format": {"type": "json_schema"}}),
            ))
            .with_status(200)
            .with_body(completion(r#"{"value": 7}"#))
            .create_async()
            .await;

        let client = LlmClient::new(server.url(), "k", "m".into(), 5).unwrap();
        let answer: Answer = client
            .complete_json(&[ChatMessage::user("q")], "answer", &json!({"type": "object"}))
            .await
            .unwrap();
        assert_eq!(answer.value, 7);
    }

    /// Expect empty content and error statuses to be errors
    #[tokio::test]
    async fn test_empty_content_and_errors() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/")
            .with_status(200)
            .with_body(json!({"choices": []}).to_string())
            .create_async()
            .await;
        let client = LlmClient::new(server.url(), "k", "m".into(), 5).unwrap();
        assert!(client.complete(&[ChatMessage::user("q")]).await.is_err());

        let mut failing = mockito::Server::new_async().await;
        failing
            .mock("POST", "/")
            .with_status(429)
            .with_body("rate limited")
            .create_async()
            .await;
        let client = LlmClient::new(failing.url(), "k", "m".into(), 5).unwrap();
        assert!(client.complete(&[ChatMessage::user("q")]).await.is_err());
    }
}
