use crate::app_error::AppError;
use crate::cli::Provider;
use crate::config::Config;
use crate::llm::prompt::SYSTEM_MESSAGE;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

const GEMINI_MODEL: &str = "gemini-2.5-pro";
const CLAUDE_API_URL: &str = "https://api.anthropic.com/v1/messages";
const CLAUDE_MODEL: &str = "claude-3-5-sonnet-20241022";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";
const OPENAI_MODEL: &str = "gpt-4";
const XAI_API_URL: &str = "https://api.x.ai/v1/chat/completions";
const XAI_MODEL: &str = "grok-4-latest";
const WATSONX_BASE_URL: &str = "https://us-south.ml.cloud.ibm.com";
const WATSONX_GENERATION_PATH: &str = "/ml/v1/text/generation?version=2024-05-31";
const WATSONX_MODEL: &str = "ibm/granite-13b-chat-v2";
const IAM_TOKEN_URL: &str = "https://iam.cloud.ibm.com/identity/token";

// Low temperature for consistent code generation.
const TEMPERATURE: f64 = 0.1;
const MAX_TOKENS: u32 = 4096;
const WATSONX_MAX_NEW_TOKENS: u32 = 1000;

enum ClientKind {
    Gemini {
        api_key: String,
        api_url: String,
    },
    Claude {
        api_key: String,
    },
    // ChatGPT and xAI share the OpenAI wire format and differ only in
    // endpoint and model.
    OpenAiCompat {
        api_key: String,
        api_url: &'static str,
        model: &'static str,
    },
    Watsonx {
        api_key: String,
        project_id: String,
    },
}

pub(crate) struct ProviderClient {
    http: Client,
    kind: ClientKind,
}

/// Build the client for the configured provider. Watsonx additionally
/// needs a project id, so construction can fail on configuration.
pub(crate) fn client_for(config: &Config) -> Result<ProviderClient, AppError> {
    let api_key = config.api_key.clone();
    let kind = match config.provider {
        Provider::Gemini => ClientKind::Gemini {
            api_key,
            api_url: format!(
                "https://generativelanguage.googleapis.com/v1beta/models/{GEMINI_MODEL}:generateContent"
            ),
        },
        Provider::Claude => ClientKind::Claude { api_key },
        Provider::ChatGpt => ClientKind::OpenAiCompat {
            api_key,
            api_url: OPENAI_API_URL,
            model: OPENAI_MODEL,
        },
        Provider::Xai => ClientKind::OpenAiCompat {
            api_key,
            api_url: XAI_API_URL,
            model: XAI_MODEL,
        },
        Provider::Watsonx => {
            let project_id = config.project_id.clone().ok_or_else(|| {
                AppError::Config("A project id is required for the watsonx provider.".to_string())
            })?;
            ClientKind::Watsonx {
                api_key,
                project_id,
            }
        }
    };

    let http = Client::builder()
        .connect_timeout(Duration::from_secs(15))
        .tcp_keepalive(Some(Duration::from_secs(30)))
        .pool_idle_timeout(Duration::from_secs(90))
        .build()
        .unwrap_or_else(|_| Client::new());

    Ok(ProviderClient { http, kind })
}

impl ProviderClient {
    pub(crate) fn model_name(&self) -> &str {
        match &self.kind {
            ClientKind::Gemini { .. } => GEMINI_MODEL,
            ClientKind::Claude { .. } => CLAUDE_MODEL,
            ClientKind::OpenAiCompat { model, .. } => model,
            ClientKind::Watsonx { .. } => WATSONX_MODEL,
        }
    }

    pub(crate) fn url(&self) -> String {
        match &self.kind {
            ClientKind::Gemini { api_url, .. } => api_url.clone(),
            ClientKind::Claude { .. } => CLAUDE_API_URL.to_string(),
            ClientKind::OpenAiCompat { api_url, .. } => api_url.to_string(),
            ClientKind::Watsonx { .. } => {
                format!("{WATSONX_BASE_URL}{WATSONX_GENERATION_PATH}")
            }
        }
    }

    pub(crate) fn build_request_body(&self, prompt: &str) -> Value {
        match &self.kind {
            ClientKind::Gemini { .. } => json!({
                "contents": [{
                    "parts": [{ "text": prompt }]
                }],
                "generationConfig": {
                    "temperature": TEMPERATURE
                }
            }),
            ClientKind::Claude { .. } => json!({
                "model": CLAUDE_MODEL,
                "max_tokens": MAX_TOKENS,
                "temperature": TEMPERATURE,
                "system": SYSTEM_MESSAGE,
                "messages": [
                    { "role": "user", "content": prompt }
                ]
            }),
            ClientKind::OpenAiCompat { model, .. } => json!({
                "model": model,
                "temperature": TEMPERATURE,
                "max_tokens": MAX_TOKENS,
                "messages": [
                    { "role": "system", "content": SYSTEM_MESSAGE },
                    { "role": "user", "content": prompt }
                ]
            }),
            // Watsonx takes a single input string, so the system message
            // is folded into it.
            ClientKind::Watsonx { project_id, .. } => json!({
                "model_id": WATSONX_MODEL,
                "input": format!("{SYSTEM_MESSAGE}\n\n{prompt}"),
                "parameters": {
                    "decoding_method": "greedy",
                    "max_new_tokens": WATSONX_MAX_NEW_TOKENS,
                    "min_new_tokens": 1,
                    "temperature": TEMPERATURE,
                    "top_k": 50,
                    "top_p": 1
                },
                "project_id": project_id
            }),
        }
    }

    // One attempt only; retrying a failed provider call is a caller-level
    // concern.
    pub(crate) async fn query(&self, request_body: &Value) -> Result<Value, AppError> {
        match &self.kind {
            ClientKind::Gemini { api_key, api_url } => {
                let resp = self
                    .http
                    .post(api_url)
                    .header("x-goog-api-key", api_key)
                    .header("Content-Type", "application/json")
                    .json(request_body)
                    .send()
                    .await
                    .map_err(|e| transport_error(e, api_key))?;
                handle_response_to_json(resp, api_key).await
            }
            ClientKind::Claude { api_key } => {
                let resp = self
                    .http
                    .post(CLAUDE_API_URL)
                    .header("x-api-key", api_key)
                    .header("anthropic-version", ANTHROPIC_VERSION)
                    .header("Content-Type", "application/json")
                    .json(request_body)
                    .send()
                    .await
                    .map_err(|e| transport_error(e, api_key))?;
                handle_response_to_json(resp, api_key).await
            }
            ClientKind::OpenAiCompat {
                api_key, api_url, ..
            } => {
                let resp = self
                    .http
                    .post(*api_url)
                    .bearer_auth(api_key)
                    .header("Content-Type", "application/json")
                    .json(request_body)
                    .send()
                    .await
                    .map_err(|e| transport_error(e, api_key))?;
                handle_response_to_json(resp, api_key).await
            }
            ClientKind::Watsonx { api_key, .. } => {
                let token = self.fetch_iam_token(api_key).await?;
                let resp = self
                    .http
                    .post(self.url())
                    .bearer_auth(&token)
                    .header("Content-Type", "application/json")
                    .json(request_body)
                    .send()
                    .await
                    .map_err(|e| transport_error(e, api_key))?;
                handle_response_to_json(resp, api_key).await
            }
        }
    }

    // Watsonx authenticates with a short-lived IAM token exchanged for
    // the API key; one token per call is fine at this call rate.
    async fn fetch_iam_token(&self, api_key: &str) -> Result<String, AppError> {
        let resp = self
            .http
            .post(IAM_TOKEN_URL)
            .form(&[
                ("grant_type", "urn:ibm:params:oauth:grant-type:apikey"),
                ("apikey", api_key),
            ])
            .send()
            .await
            .map_err(|e| transport_error(e, api_key))?;

        let token_json = handle_response_to_json(resp, api_key).await?;
        token_json
            .get("access_token")
            .and_then(|t| t.as_str())
            .map(|t| t.to_string())
            .ok_or_else(|| {
                AppError::Network("IAM token response contained no access_token.".to_string())
            })
    }

    pub(crate) fn extract_text(&self, response: &Value) -> Result<String, AppError> {
        match &self.kind {
            ClientKind::Gemini { .. } => extract_text_from_gemini_response(response),
            ClientKind::Claude { .. } => extract_text_from_claude_response(response),
            ClientKind::OpenAiCompat { .. } => extract_text_from_chat_response(response),
            ClientKind::Watsonx { .. } => extract_text_from_watsonx_response(response),
        }
    }
}

fn transport_error(e: reqwest::Error, api_key: &str) -> AppError {
    AppError::Network(censor_api_key(&e.to_string(), api_key))
}

async fn handle_response_to_json(resp: reqwest::Response, api_key: &str) -> Result<Value, AppError> {
    let status = resp.status();
    let text = resp
        .text()
        .await
        .map_err(|e| transport_error(e, api_key))?;

    if !status.is_success() {
        return Err(AppError::Network(format!(
            "HTTP {status} with body:\n{}",
            censor_api_key(&text, api_key)
        )));
    }

    serde_json::from_str::<Value>(&text).map_err(|e| {
        AppError::Network(format!(
            "Invalid JSON in success response: {e}; raw body:\n{}",
            censor_api_key(&text, api_key)
        ))
    })
}

pub(crate) fn censor_api_key(text: &str, api_key: &str) -> String {
    if api_key.is_empty() {
        return text.to_string();
    }
    // Only censor things that look like keys. Very short strings are unlikely to be keys.
    let censored_key = if api_key.len() > 8 {
        format!("...{}", &api_key[api_key.len() - 4..])
    } else {
        "...".to_string()
    };
    text.replace(api_key, &censored_key)
}

pub(crate) fn extract_text_from_gemini_response(response: &Value) -> Result<String, AppError> {
    let parts_array = response
        .get("candidates")
        .and_then(|c| c.as_array())
        .and_then(|a| a.first())
        .and_then(|c| c.get("content"))
        .and_then(|c| c.get("parts"))
        .and_then(|p| p.as_array())
        .ok_or_else(|| {
            AppError::ResponseExtraction(
                "Could not find 'parts' array in Gemini response JSON.".to_string(),
            )
        })?;

    let text_segments: Vec<String> = parts_array
        .iter()
        .filter_map(|part| part.get("text"))
        .filter_map(|text_val| text_val.as_str())
        .map(|s| s.to_string())
        .collect();

    if text_segments.is_empty() {
        return Err(AppError::ResponseExtraction(
            "Found 'parts' array, but it contained no valid text segments.".to_string(),
        ));
    }

    Ok(text_segments.join(""))
}

pub(crate) fn extract_text_from_claude_response(response: &Value) -> Result<String, AppError> {
    response
        .get("content")
        .and_then(|c| c.as_array())
        .and_then(|a| a.first())
        .and_then(|block| block.get("text"))
        .and_then(|t| t.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| {
            AppError::ResponseExtraction(
                "Could not find text content in Claude response JSON.".to_string(),
            )
        })
}

pub(crate) fn extract_text_from_chat_response(response: &Value) -> Result<String, AppError> {
    response
        .get("choices")
        .and_then(|c| c.as_array())
        .and_then(|a| a.first())
        .and_then(|choice| choice.get("message"))
        .and_then(|msg| msg.get("content"))
        .and_then(|c| c.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| {
            AppError::ResponseExtraction(
                "Could not find 'content' in chat completion response JSON.".to_string(),
            )
        })
}

pub(crate) fn extract_text_from_watsonx_response(response: &Value) -> Result<String, AppError> {
    response
        .get("results")
        .and_then(|r| r.as_array())
        .and_then(|a| a.first())
        .and_then(|r| r.get("generated_text"))
        .and_then(|t| t.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| {
            AppError::ResponseExtraction(
                "Could not find 'generated_text' in watsonx response JSON.".to_string(),
            )
        })
}
