mod api;
mod prompt;

#[cfg(test)]
mod api_test;

pub use prompt::FilesData;

use crate::app_error::AppError;
use crate::config::Config;
use crate::logger::Logger;
use serde_json::json;
use std::time::Instant;

/// Send the instructions plus file contents to the configured provider and
/// return the response text, logging the prompt, request, and response
/// along the way.
pub async fn process_files(
    config: &Config,
    files_data: &FilesData,
    logger: &Logger,
) -> Result<String, AppError> {
    let prompt = prompt::create_prompt(&config.instructions, files_data);
    logger.log_text("query.txt", &prompt)?;

    let client = api::client_for(config)?;
    let request_body = client.build_request_body(&prompt);
    logger.log_json(
        "query.json",
        &json!({
            "url": client.url(),
            "model": client.model_name(),
            "body": &request_body
        }),
    )?;

    let start_time = Instant::now();
    let response_result = client.query(&request_body).await;
    let duration = start_time.elapsed();

    println!(
        "LLM call to {} took {:.3}s",
        client.model_name(),
        duration.as_secs_f64()
    );

    let response_json = match response_result {
        Ok(json) => json,
        Err(e) => {
            let error_json =
                json!({ "error": e.to_string(), "totalResponseTime": duration.as_millis() });
            logger.log_json("response.json", &error_json)?;
            return Err(e);
        }
    };

    let mut logged_response = response_json.clone();
    if let Some(obj) = logged_response.as_object_mut() {
        obj.insert("totalResponseTime".to_string(), json!(duration.as_millis()));
    }
    logger.log_json("response.json", &logged_response)?;

    let response_text = match client.extract_text(&response_json) {
        Ok(text) => text,
        Err(e) => {
            logger.log_text("response.txt", &format!("ERROR\n{e}"))?;
            return Err(e);
        }
    };
    logger.log_text("response.txt", &response_text)?;

    Ok(response_text)
}
