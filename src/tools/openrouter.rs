// src/tools/openrouter.rs
//! OpenRouter chat-completions adapter for visual comparison.

use super::{ComparisonImages, VisionJudge};
use crate::error::{ForgeError, ForgeResult};
use reqwest::blocking::Client as HttpClient;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const TOOL: &str = "vision API";

pub const COMPARISON_PROMPT: &str = "Compare the original website screenshots (BASELINE) with the redesigned website screenshots (NEW).

Analyze and score the redesign on a scale of 1-10 for each category:
1. Visual polish (is the redesign more professional, modern, and visually appealing?)
2. Brand fidelity (does it still feel like the same business? Same colors, style, vibe?)
3. Content completeness (is anything from the original missing? Are all sections present?)
4. Mobile experience (is mobile layout better, worse, or about the same?)

Then provide an overall score 1-10 with the question: \"Would the business owner be impressed?\"

Respond in this exact format:
VISUAL_POLISH: X/10
BRAND_FIDELITY: X/10
CONTENT_COMPLETENESS: X/10
MOBILE_EXPERIENCE: X/10
OVERALL: X/10
ANALYSIS: [2-3 sentences of specific feedback on what's better and what could improve]";

#[derive(Debug, Clone)]
pub struct OpenRouterJudge {
    endpoint: String,
    model: String,
    timeout: Duration,
}

impl OpenRouterJudge {
    #[must_use]
    pub fn new(endpoint: String, model: String, timeout: Duration) -> Self {
        Self {
            endpoint,
            model,
            timeout,
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: Vec<ContentPart>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Serialize)]
struct ImageUrl {
    url: String,
}

impl ImageUrl {
    fn png(data: &str) -> Self {
        Self {
            url: format!("data:image/png;base64,{data}"),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: ResponseContent,
}

/// Providers return either a plain string or a list of typed parts.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ResponseContent {
    Text(String),
    Parts(Vec<ResponsePart>),
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

impl ResponseContent {
    fn into_text(self) -> Option<String> {
        match self {
            Self::Text(t) => Some(t),
            Self::Parts(parts) => parts.into_iter().find_map(|p| p.text),
        }
    }
}

fn build_request<'a>(model: &'a str, images: &ComparisonImages) -> ChatRequest<'a> {
    let content = vec![
        ContentPart::Text {
            text: format!("BASELINE - Desktop:\n{COMPARISON_PROMPT}"),
        },
        ContentPart::ImageUrl {
            image_url: ImageUrl::png(&images.baseline_desktop),
        },
        ContentPart::Text {
            text: "BASELINE - Mobile:\n".to_string(),
        },
        ContentPart::ImageUrl {
            image_url: ImageUrl::png(&images.baseline_mobile),
        },
        ContentPart::Text {
            text: "NEW - Desktop:\n".to_string(),
        },
        ContentPart::ImageUrl {
            image_url: ImageUrl::png(&images.new_desktop),
        },
        ContentPart::Text {
            text: "NEW - Mobile:\n".to_string(),
        },
        ContentPart::ImageUrl {
            image_url: ImageUrl::png(&images.new_mobile),
        },
    ];
    ChatRequest {
        model,
        messages: vec![ChatMessage {
            role: "user",
            content,
        }],
    }
}

/// Extracts the first choice's text from a chat-completions response body.
///
/// # Errors
/// Returns `ToolExecution` if the body is malformed or has no choices.
pub fn parse_response(body: &str) -> ForgeResult<String> {
    let parsed: ChatResponse = serde_json::from_str(body)
        .map_err(|e| ForgeError::execution(TOOL, format!("invalid response: {e}")))?;
    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content.into_text())
        .ok_or_else(|| ForgeError::execution(TOOL, "no response from API"))
}

impl VisionJudge for OpenRouterJudge {
    fn compare(&self, api_key: &str, images: &ComparisonImages) -> ForgeResult<String> {
        let client = HttpClient::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| ForgeError::execution(TOOL, e.to_string()))?;

        let request = build_request(&self.model, images);
        tracing::info!(model = %self.model, endpoint = %self.endpoint, "requesting visual comparison");
        let response = client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .header("HTTP-Referer", "https://github.com/misty-step/siteforge")
            .header("X-Title", "Site Forge")
            .json(&request)
            .send()
            .map_err(|e| ForgeError::execution(TOOL, e.to_string()))?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(ForgeError::execution(
                TOOL,
                format!("API returned status {}", status.as_u16()),
            ));
        }
        let body = response
            .text()
            .map_err(|e| ForgeError::execution(TOOL, e.to_string()))?;
        parse_response(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn images() -> ComparisonImages {
        ComparisonImages {
            baseline_desktop: "QkQ=".into(),
            baseline_mobile: "Qk0=".into(),
            new_desktop: "TkQ=".into(),
            new_mobile: "Tk0=".into(),
        }
    }

    #[test]
    fn request_interleaves_labels_and_images() {
        let imgs = images();
        let value = serde_json::to_value(build_request("m", &imgs)).unwrap();
        let parts = value["messages"][0]["content"].as_array().unwrap();
        assert_eq!(parts.len(), 8);
        assert_eq!(parts[0]["type"], "text");
        assert!(parts[0]["text"].as_str().unwrap().starts_with("BASELINE - Desktop:"));
        assert_eq!(parts[1]["type"], "image_url");
        assert_eq!(parts[1]["image_url"]["url"], "data:image/png;base64,QkQ=");
        assert_eq!(parts[7]["image_url"]["url"], "data:image/png;base64,Tk0=");
        assert_eq!(value["model"], "m");
    }

    #[test]
    fn response_content_may_be_string_or_parts() {
        let s = r#"{"choices":[{"message":{"role":"assistant","content":"OVERALL: 8/10"}}]}"#;
        assert_eq!(parse_response(s).unwrap(), "OVERALL: 8/10");
        let p = r#"{"choices":[{"message":{"content":[{"type":"text","text":"OVERALL: 6/10"}]}}]}"#;
        assert_eq!(parse_response(p).unwrap(), "OVERALL: 6/10");
    }

    #[test]
    fn empty_choices_is_an_error() {
        let err = parse_response(r#"{"choices":[]}"#).unwrap_err();
        assert!(err.to_string().contains("no response from API"));
    }
}
