use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use bytes::Bytes;
use reqwest::Client;
use serde_json::Value as JsonValue;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::services::parser::ParseError;

pub type GenerationFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + Send + 'a>>;

/// Image returned by the image endpoint: either a URL to download or the
/// encoded bytes themselves.
#[derive(Debug, Clone)]
pub enum GeneratedImage {
    Url(String),
    Inline(Bytes),
}

/// Outbound calls to the generative-AI provider.
pub trait Generator: Send + Sync {
    /// Raw assistant message for a system/user prompt pair.
    fn complete<'a>(
        &'a self,
        system_prompt: &'a str,
        user_prompt: &'a str,
    ) -> GenerationFuture<'a, String>;

    fn generate_image<'a>(&'a self, prompt: &'a str) -> GenerationFuture<'a, GeneratedImage>;

    fn fetch_image<'a>(&'a self, url: &'a str) -> GenerationFuture<'a, Bytes>;
}

#[derive(Clone)]
pub struct AIService {
    client: Client,
    api_key: String,
    base_url: String,
    text_model: String,
    image_model: String,
    timeout: Duration,
}

impl AIService {
    pub fn new(config: &Config, client: Client) -> Self {
        Self {
            client,
            api_key: config.openai_api_key.clone(),
            base_url: config.openai_base_url.trim_end_matches('/').to_string(),
            text_model: config.text_model.clone(),
            image_model: config.image_model.clone(),
            timeout: config.upstream_timeout(),
        }
    }

    async fn chat_openai(&self, system_prompt: &str, user_prompt: &str) -> Result<String> {
        let payload = serde_json::json!({
            "model": self.text_model,
            "messages": [
                {"role": "system", "content": system_prompt},
                {"role": "user", "content": user_prompt}
            ],
            "response_format": { "type": "json_object" },
            "max_tokens": 1000,
            "temperature": 0.5
        });

        let body = self
            .post_json(&format!("{}/chat/completions", self.base_url), &payload)
            .await?;

        body.get("choices")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("message"))
            .and_then(|m| m.get("content"))
            .and_then(|c| c.as_str())
            .map(|s| s.to_string())
            .ok_or(Error::MalformedOutput(ParseError::MissingField(
                "choices[0].message.content",
            )))
    }

    async fn image_openai(&self, prompt: &str) -> Result<GeneratedImage> {
        let payload = serde_json::json!({
            "model": self.image_model,
            "prompt": prompt,
            "n": 1,
            "size": "1024x1024"
        });

        let body = self
            .post_json(&format!("{}/images/generations", self.base_url), &payload)
            .await?;
        let first = body
            .get("data")
            .and_then(|d| d.get(0))
            .ok_or(Error::MalformedOutput(ParseError::MissingField("data[0]")))?;

        if let Some(url) = first.get("url").and_then(|u| u.as_str()) {
            return Ok(GeneratedImage::Url(url.to_string()));
        }
        if let Some(encoded) = first.get("b64_json").and_then(|b| b.as_str()) {
            let decoded = BASE64
                .decode(encoded)
                .map_err(|e| Error::Upstream(format!("Invalid base64 image payload: {}", e)))?;
            return Ok(GeneratedImage::Inline(Bytes::from(decoded)));
        }
        Err(Error::MalformedOutput(ParseError::MissingField(
            "data[0].url",
        )))
    }

    async fn download(&self, raw_url: &str) -> Result<Bytes> {
        let url = url::Url::parse(raw_url)
            .map_err(|e| Error::Upstream(format!("Invalid image URL {}: {}", raw_url, e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::Upstream(format!(
                "Unsupported image URL scheme: {}",
                url.scheme()
            )));
        }

        tracing::info!(host = url.host_str().unwrap_or(""), "Downloading generated image");
        let res = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await?
            .error_for_status()?;
        Ok(res.bytes().await?)
    }

    async fn post_json(&self, url: &str, payload: &JsonValue) -> Result<JsonValue> {
        let res = self
            .client
            .post(url)
            .bearer_auth(&self.api_key)
            .json(payload)
            .timeout(self.timeout)
            .send()
            .await?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(Error::Upstream(format!("OpenAI API Error {}: {}", status, text)));
        }

        Ok(res.json().await?)
    }
}

impl Generator for AIService {
    fn complete<'a>(
        &'a self,
        system_prompt: &'a str,
        user_prompt: &'a str,
    ) -> GenerationFuture<'a, String> {
        Box::pin(self.chat_openai(system_prompt, user_prompt))
    }

    fn generate_image<'a>(&'a self, prompt: &'a str) -> GenerationFuture<'a, GeneratedImage> {
        Box::pin(self.image_openai(prompt))
    }

    fn fetch_image<'a>(&'a self, url: &'a str) -> GenerationFuture<'a, Bytes> {
        Box::pin(self.download(url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        extract::State,
        http::{header, HeaderMap, StatusCode},
        response::{IntoResponse, Response},
        routing::{get, post},
        Json, Router,
    };
    use image::{ImageBuffer, ImageFormat, Rgba};
    use std::io::Cursor;

    const API_KEY: &str = "sk-local";

    fn png() -> Vec<u8> {
        let img = ImageBuffer::from_pixel(16, 16, Rgba([200u8, 40, 40, 255]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    async fn chat(headers: HeaderMap, Json(body): Json<JsonValue>) -> Response {
        if headers[header::AUTHORIZATION] != format!("Bearer {}", API_KEY).as_str() {
            return StatusCode::UNAUTHORIZED.into_response();
        }
        assert_eq!(body["response_format"]["type"], "json_object");
        assert_eq!(body["messages"][0]["role"], "system");
        let prompt = body["messages"][1]["content"].as_str().unwrap_or_default();
        if prompt == "empty" {
            return Json(serde_json::json!({ "choices": [] })).into_response();
        }
        Json(serde_json::json!({
            "choices": [{ "message": { "content": format!("echo: {}", prompt) } }]
        }))
        .into_response()
    }

    /// The prompt picks the reply shape.
    async fn images(State(base): State<String>, Json(body): Json<JsonValue>) -> Response {
        match body["prompt"].as_str().unwrap_or_default() {
            "inline" => Json(serde_json::json!({
                "data": [{ "b64_json": BASE64.encode(png()) }]
            }))
            .into_response(),
            "broken" => (StatusCode::INTERNAL_SERVER_ERROR, "provider down").into_response(),
            _ => Json(serde_json::json!({
                "data": [{ "url": format!("{}/files/picture.png", base) }]
            }))
            .into_response(),
        }
    }

    async fn picture() -> Response {
        ([(header::CONTENT_TYPE, "image/png")], png()).into_response()
    }

    async fn spawn_provider() -> AIService {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        let router = Router::new()
            .route("/chat/completions", post(chat))
            .route("/images/generations", post(images))
            .route("/files/picture.png", get(picture))
            .with_state(base.clone());
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        let config = Config {
            server_address: "127.0.0.1:0".into(),
            openai_api_key: API_KEY.into(),
            openai_base_url: format!("{}/", base),
            text_model: "gpt-4o".into(),
            image_model: "dall-e-3".into(),
            max_questions: 10,
            generation_max_attempts: 1,
            retry_base_delay_ms: 1,
            upstream_timeout_secs: 5,
            public_rps: 100,
            image_store_capacity: None,
        };
        let client = Client::builder().no_proxy().build().unwrap();
        AIService::new(&config, client)
    }

    #[tokio::test]
    async fn completion_returns_first_message_content() {
        let service = spawn_provider().await;

        let content = service.complete("system", "hello").await.unwrap();
        assert_eq!(content, "echo: hello");

        let err = service.complete("system", "empty").await.unwrap_err();
        assert!(matches!(err, Error::MalformedOutput(ParseError::MissingField(_))));
    }

    #[tokio::test]
    async fn image_url_reply_is_downloaded() {
        let service = spawn_provider().await;

        let GeneratedImage::Url(url) = service.generate_image("a lighthouse").await.unwrap() else {
            panic!("expected a url reply");
        };
        assert!(url.ends_with("/files/picture.png"));

        let bytes = service.fetch_image(&url).await.unwrap();
        assert_eq!(bytes.as_ref(), png().as_slice());
    }

    #[tokio::test]
    async fn b64_json_reply_is_decoded_inline() {
        let service = spawn_provider().await;

        let GeneratedImage::Inline(bytes) = service.generate_image("inline").await.unwrap() else {
            panic!("expected inline bytes");
        };
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (16, 16));
    }

    #[tokio::test]
    async fn provider_errors_are_transient_upstream_failures() {
        let service = spawn_provider().await;

        let err = service.generate_image("broken").await.unwrap_err();
        match &err {
            Error::Upstream(msg) => {
                assert!(msg.contains("500"));
                assert!(msg.contains("provider down"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(err.is_transient());
    }

    #[tokio::test]
    async fn only_http_image_urls_are_fetched() {
        let service = spawn_provider().await;

        for url in ["file:///etc/passwd", "ftp://example.com/a.png", "not a url"] {
            let err = service.fetch_image(url).await.unwrap_err();
            assert!(matches!(err, Error::Upstream(_)), "{} was not rejected", url);
        }
    }
}
