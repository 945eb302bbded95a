use crate::constants::{API_BASE_VAR, GEMINI_API_BASE, GEMINI_IMAGE_MODEL};
use crate::error::{Error, Result};
use crate::gemini::{GenerateContentResponse, Part};
use crate::request::GenerationRequest;
use async_trait::async_trait;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE},
    Client,
};

const API_KEY_HEADER: &str = "x-goog-api-key";

/// A remote model that turns one request into one response. Each call is a
/// single blocking round trip; nothing is retried.
#[async_trait]
pub trait ImageModel: Send + Sync {
    async fn generate(
        &self,
        api_key: &str,
        request: &GenerationRequest,
    ) -> Result<GenerateContentResponse>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponsePart {
    Image(Vec<u8>),
    Text(String),
    Unrecognized,
}

/// Parts of the first candidate, in the order the API returned them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationResponse {
    pub parts: Vec<ResponsePart>,
}

impl GenerationResponse {
    pub fn from_api(response: GenerateContentResponse) -> Result<Self> {
        let candidate = response
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| Error::EmptyResponse("no candidates returned from the API".into()))?;
        let parts = candidate
            .content
            .map(|content| content.parts)
            .filter(|parts| !parts.is_empty())
            .ok_or_else(|| Error::EmptyResponse("no content parts returned from the API".into()))?;

        let parts = parts
            .into_iter()
            .map(|part| -> Result<ResponsePart> {
                Ok(match part {
                    Part::InlineData { inline_data } => {
                        ResponsePart::Image(base64::decode(inline_data.data)?)
                    }
                    Part::Text { text } if !text.is_empty() => ResponsePart::Text(text),
                    _ => ResponsePart::Unrecognized,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(GenerationResponse { parts })
    }
}

pub fn build_headers(api_key: &str) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(
        HeaderName::from_static(API_KEY_HEADER),
        HeaderValue::from_str(api_key)?,
    );
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    Ok(headers)
}

pub fn create_spinner(color: &str, message: String) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
            .template(&format!("{{spinner:.{}}} {{msg}}", color)),
    );
    spinner.enable_steady_tick(100);
    spinner.set_message(message);

    spinner
}

pub struct GeminiClient {
    http: Client,
    base_url: String,
    model: String,
}

impl GeminiClient {
    pub fn new(http: Client, base_url: impl Into<String>, model: impl Into<String>) -> Self {
        GeminiClient {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
        }
    }

    /// Default endpoint and model, honouring `GEMINI_API_BASE`.
    pub fn from_env(http: Client) -> Self {
        let base_url = std::env::var(API_BASE_VAR)
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| GEMINI_API_BASE.to_string());
        GeminiClient::new(http, base_url, GEMINI_IMAGE_MODEL)
    }

    pub fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl ImageModel for GeminiClient {
    async fn generate(
        &self,
        api_key: &str,
        request: &GenerationRequest,
    ) -> Result<GenerateContentResponse> {
        let headers = build_headers(api_key)?;
        let endpoint = self.endpoint();
        log::info!("requesting image from {}", endpoint);

        let spinner = create_spinner("cyan", "Generating image...".to_string());
        let response = self
            .http
            .post(&endpoint)
            .headers(headers)
            .json(&request.to_wire())
            .send()
            .await;
        spinner.finish_and_clear();
        let response = response?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Api { status, body });
        }

        let body = response.text().await?;
        log::debug!("received {} byte response", body.len());
        Ok(serde_json::from_str(&body)?)
    }
}
