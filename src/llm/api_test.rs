use super::api::{
    censor_api_key, client_for, extract_text_from_chat_response, extract_text_from_claude_response,
    extract_text_from_gemini_response, extract_text_from_watsonx_response,
};
use crate::app_error::AppError;
use crate::cli::Provider;
use crate::config::Config;
use serde_json::json;

fn config_for(provider: Provider) -> Config {
    Config {
        provider,
        api_key: "test-key".to_string(),
        project_id: match provider {
            Provider::Watsonx => Some("proj-42".to_string()),
            _ => None,
        },
        instructions: "irrelevant".to_string(),
    }
}

#[test]
fn test_gemini_request_body_shape() {
    let client = client_for(&config_for(Provider::Gemini)).unwrap();
    let body = client.build_request_body("the prompt");

    assert_eq!(body["contents"][0]["parts"][0]["text"], "the prompt");
    assert!(body["generationConfig"]["temperature"].is_number());
    assert!(client.url().contains("generativelanguage.googleapis.com"));
}

#[test]
fn test_claude_request_body_shape() {
    let client = client_for(&config_for(Provider::Claude)).unwrap();
    let body = client.build_request_body("the prompt");

    assert_eq!(body["model"], "claude-3-5-sonnet-20241022");
    assert!(body["system"].as_str().unwrap().contains("expert developer"));
    assert_eq!(body["messages"][0]["role"], "user");
    assert_eq!(body["messages"][0]["content"], "the prompt");
    assert_eq!(client.url(), "https://api.anthropic.com/v1/messages");
}

#[test]
fn test_chatgpt_and_xai_share_wire_format() {
    let chatgpt = client_for(&config_for(Provider::ChatGpt)).unwrap();
    let xai = client_for(&config_for(Provider::Xai)).unwrap();

    let gpt_body = chatgpt.build_request_body("p");
    let xai_body = xai.build_request_body("p");

    assert_eq!(gpt_body["model"], "gpt-4");
    assert_eq!(xai_body["model"], "grok-4-latest");
    for body in [&gpt_body, &xai_body] {
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["role"], "user");
    }
    assert!(chatgpt.url().contains("api.openai.com"));
    assert!(xai.url().contains("api.x.ai"));
}

#[test]
fn test_watsonx_request_body_shape() {
    let client = client_for(&config_for(Provider::Watsonx)).unwrap();
    let body = client.build_request_body("the prompt");

    assert_eq!(body["model_id"], "ibm/granite-13b-chat-v2");
    assert_eq!(body["project_id"], "proj-42");
    assert_eq!(body["parameters"]["decoding_method"], "greedy");
    assert!(body["input"].as_str().unwrap().contains("the prompt"));
    assert!(client.url().contains("ml.cloud.ibm.com"));
}

#[test]
fn test_watsonx_requires_project_id() {
    let mut config = config_for(Provider::Watsonx);
    config.project_id = None;

    let result = client_for(&config);
    assert!(matches!(result, Err(AppError::Config(_))));
}

#[test]
fn test_extract_text_from_gemini_response() {
    let response = json!({
        "candidates": [{
            "content": {
                "parts": [
                    { "text": "part one " },
                    { "text": "part two" }
                ]
            }
        }]
    });

    let text = extract_text_from_gemini_response(&response).unwrap();
    assert_eq!(text, "part one part two");
}

#[test]
fn test_extract_text_from_gemini_response_missing_parts() {
    let response = json!({ "candidates": [] });
    let result = extract_text_from_gemini_response(&response);
    assert!(matches!(result, Err(AppError::ResponseExtraction(_))));
}

#[test]
fn test_extract_text_from_claude_response() {
    let response = json!({
        "content": [{ "type": "text", "text": "the reply" }]
    });

    assert_eq!(
        extract_text_from_claude_response(&response).unwrap(),
        "the reply"
    );
}

#[test]
fn test_extract_text_from_chat_response() {
    let response = json!({
        "choices": [{
            "message": { "role": "assistant", "content": "the reply" }
        }]
    });

    assert_eq!(
        extract_text_from_chat_response(&response).unwrap(),
        "the reply"
    );
}

#[test]
fn test_extract_text_from_watsonx_response() {
    let response = json!({
        "results": [{ "generated_text": "the reply" }]
    });

    assert_eq!(
        extract_text_from_watsonx_response(&response).unwrap(),
        "the reply"
    );
}

#[test]
fn test_extract_text_errors_on_empty_payloads() {
    let empty = json!({});
    assert!(extract_text_from_claude_response(&empty).is_err());
    assert!(extract_text_from_chat_response(&empty).is_err());
    assert!(extract_text_from_watsonx_response(&empty).is_err());
}

#[test]
fn test_censor_api_key_long_key() {
    let censored = censor_api_key("error with key abcdefgh1234 inside", "abcdefgh1234");
    assert_eq!(censored, "error with key ...1234 inside");
}

#[test]
fn test_censor_api_key_short_key() {
    let censored = censor_api_key("key: short", "short");
    assert_eq!(censored, "key: ...");
}

#[test]
fn test_censor_api_key_empty_key_is_noop() {
    assert_eq!(censor_api_key("unchanged", ""), "unchanged");
}
