use crate::llm::client::{
    SchemaDescriptor, StructuredGenerator, WebSearchGenerator, WebSearchResponse,
};
use crate::types::{AppError, Citation, Result};
use crate::utils::toml_config::ProviderConfig;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::time::Duration;

/// Title used when a citation arrives without one
const DEFAULT_CITATION_TITLE: &str = "Source";

/// Client for OpenAI-compatible APIs.
///
/// Structured generation goes through `/chat/completions` with a
/// `json_schema` response format; web search goes through `/responses`
/// with the `web_search_preview` tool.
pub struct OpenAIClient {
    http: reqwest::Client,
    api_key: String,
    api_base: String,
    model: String,
    search_model: String,
    search_context_size: String,
    user_location_country: String,
}

impl OpenAIClient {
    pub fn new(api_key: String, config: &ProviderConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            api_key,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            search_model: config.search_model.clone(),
            search_context_size: config.search_context_size.clone(),
            user_location_country: config.user_location_country.clone(),
        })
    }

    async fn post_json<B: Serialize, R: for<'de> Deserialize<'de>>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<R> {
        let response = self
            .http
            .post(format!("{}/{}", self.api_base, endpoint))
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| AppError::LLM(format!("OpenAI request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::LLM(format!(
                "OpenAI API error ({}): {}",
                status, text
            )));
        }

        response
            .json::<R>()
            .await
            .map_err(|e| AppError::Schema(format!("Unexpected OpenAI response shape: {}", e)))
    }
}

// ============= Chat Completions (structured output) =============

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    response_format: Value,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    refusal: Option<String>,
}

fn json_schema_format(schema: &SchemaDescriptor) -> Value {
    json!({
        "type": "json_schema",
        "json_schema": {
            "name": schema.name,
            "schema": schema.schema,
            "strict": false
        }
    })
}

#[async_trait]
impl StructuredGenerator for OpenAIClient {
    async fn generate(
        &self,
        instructions: &str,
        prompt: &str,
        schema: &SchemaDescriptor,
    ) -> Result<Value> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: instructions,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            response_format: json_schema_format(schema),
        };

        let response: ChatResponse = self.post_json("chat/completions", &request).await?;

        let message = response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message)
            .ok_or_else(|| AppError::LLM("No response from OpenAI".to_string()))?;

        if let Some(refusal) = message.refusal {
            return Err(AppError::LLM(format!("Model refused: {}", refusal)));
        }

        let content = message
            .content
            .ok_or_else(|| AppError::LLM("OpenAI response had no content".to_string()))?;

        serde_json::from_str(&content)
            .map_err(|e| AppError::Schema(format!("Structured output is not valid JSON: {}", e)))
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

// ============= Responses API (web search) =============

#[derive(Debug, Deserialize)]
struct ResponsesBody {
    #[serde(default)]
    output_text: Option<String>,
    #[serde(default)]
    output: Vec<OutputItem>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum OutputItem {
    Message {
        #[serde(default)]
        content: Vec<ContentPart>,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart {
    OutputText {
        text: String,
        #[serde(default)]
        annotations: Vec<Annotation>,
    },
    Refusal {
        refusal: String,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum Annotation {
    UrlCitation {
        url: String,
        #[serde(default)]
        title: Option<String>,
        start_index: usize,
        end_index: usize,
    },
    #[serde(other)]
    Other,
}

impl ResponsesBody {
    fn into_search_response(self) -> WebSearchResponse {
        let mut parts = Vec::new();
        let mut citations = Vec::new();

        for item in self.output {
            let OutputItem::Message { content } = item else {
                continue;
            };
            for part in content {
                match part {
                    ContentPart::OutputText { text, annotations } => {
                        parts.push(text);
                        citations.extend(annotations.into_iter().filter_map(|a| match a {
                            Annotation::UrlCitation {
                                url,
                                title,
                                start_index,
                                end_index,
                            } => Some(Citation {
                                url,
                                title: title
                                    .filter(|t| !t.is_empty())
                                    .unwrap_or_else(|| DEFAULT_CITATION_TITLE.to_string()),
                                start_offset: start_index,
                                end_offset: end_index,
                            }),
                            Annotation::Other => None,
                        }));
                    }
                    ContentPart::Refusal { refusal } => {
                        tracing::debug!(%refusal, "Web search refused");
                    }
                    ContentPart::Other => {}
                }
            }
        }

        WebSearchResponse {
            text: self.output_text.unwrap_or_else(|| parts.concat()),
            citations,
        }
    }
}

#[async_trait]
impl WebSearchGenerator for OpenAIClient {
    async fn search_generate(&self, prompt: &str) -> Result<WebSearchResponse> {
        let request = json!({
            "model": self.search_model,
            "tools": [{
                "type": "web_search_preview",
                "search_context_size": self.search_context_size,
                "user_location": {
                    "type": "approximate",
                    "country": self.user_location_country
                }
            }],
            "input": prompt
        });

        let body: ResponsesBody = self.post_json("responses", &request).await?;
        Ok(body.into_search_response())
    }

    fn model_name(&self) -> &str {
        &self.search_model
    }
}
