#![allow(dead_code)]

use std::collections::VecDeque;
use std::io::Cursor;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use bytes::Bytes;
use image::{ImageBuffer, ImageFormat, Rgba};
use quizgen_backend::{
    app,
    config::Config,
    error::Error,
    services::ai_service::{GeneratedImage, GenerationFuture, Generator},
    AppState,
};
use serde_json::Value as JsonValue;
use tower::ServiceExt;

/// Scripted stand-in for the AI provider. Completions are served in order;
/// the last one repeats once the script runs out.
#[derive(Default)]
pub struct FakeGenerator {
    completions: Mutex<VecDeque<String>>,
    image_prompts: Mutex<Vec<String>>,
    pub complete_calls: AtomicUsize,
    pub image_calls: AtomicUsize,
    pub fail_images: AtomicBool,
}

impl FakeGenerator {
    pub fn new<I, S>(completions: I) -> Arc<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Arc::new(Self {
            completions: Mutex::new(completions.into_iter().map(Into::into).collect()),
            ..Default::default()
        })
    }

    pub fn failing_images<I, S>(completions: I) -> Arc<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let fake = Self::new(completions);
        fake.fail_images.store(true, Ordering::SeqCst);
        fake
    }

    pub fn completions(&self) -> usize {
        self.complete_calls.load(Ordering::SeqCst)
    }

    pub fn images(&self) -> usize {
        self.image_calls.load(Ordering::SeqCst)
    }

    /// Every prompt sent to the image endpoint, in call order.
    pub fn image_prompts(&self) -> Vec<String> {
        self.image_prompts.lock().unwrap().clone()
    }

    fn next_completion(&self) -> String {
        let mut queue = self.completions.lock().unwrap();
        if queue.len() > 1 {
            queue.pop_front().unwrap()
        } else {
            queue.front().cloned().unwrap_or_default()
        }
    }
}

impl Generator for FakeGenerator {
    fn complete<'a>(&'a self, _system: &'a str, _user: &'a str) -> GenerationFuture<'a, String> {
        Box::pin(async move {
            self.complete_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.next_completion())
        })
    }

    fn generate_image<'a>(&'a self, prompt: &'a str) -> GenerationFuture<'a, GeneratedImage> {
        Box::pin(async move {
            self.image_prompts.lock().unwrap().push(prompt.to_string());
            let n = self.image_calls.fetch_add(1, Ordering::SeqCst) + 1;
            if self.fail_images.load(Ordering::SeqCst) {
                return Err(Error::Upstream("image endpoint unavailable".into()));
            }
            Ok(GeneratedImage::Url(format!("https://images.test/generated_{}.png", n)))
        })
    }

    fn fetch_image<'a>(&'a self, _url: &'a str) -> GenerationFuture<'a, Bytes> {
        Box::pin(async move { Ok(Bytes::from(sample_png(1024, 1024))) })
    }
}

pub fn sample_png(width: u32, height: u32) -> Vec<u8> {
    let img = ImageBuffer::from_pixel(width, height, Rgba([200u8, 80, 40, 255]));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png).unwrap();
    out.into_inner()
}

pub fn test_config() -> Config {
    Config {
        server_address: "127.0.0.1:0".into(),
        openai_api_key: "sk-test".into(),
        openai_base_url: "http://localhost:9".into(),
        text_model: "test-text".into(),
        image_model: "test-image".into(),
        max_questions: 10,
        generation_max_attempts: 3,
        retry_base_delay_ms: 1,
        upstream_timeout_secs: 5,
        public_rps: 1000,
        image_store_capacity: None,
    }
}

pub fn build_app(generator: Arc<FakeGenerator>) -> (Router, AppState) {
    let config = test_config();
    let state = AppState::with_generator(&config, generator);
    (app(state.clone(), &config), state)
}

pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Bytes) {
    let resp = app.clone().oneshot(request).await.unwrap();
    let status = resp.status();
    let body = to_bytes(resp.into_body(), 8 * 1024 * 1024).await.unwrap();
    (status, body)
}

pub async fn get_json(app: &Router, uri: &str) -> (StatusCode, JsonValue) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let (status, body) = send(app, request).await;
    (status, serde_json::from_slice(&body).unwrap())
}

pub async fn post_json(app: &Router, uri: &str, payload: JsonValue) -> (StatusCode, JsonValue) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap();
    let (status, body) = send(app, request).await;
    (status, serde_json::from_slice(&body).unwrap())
}

pub const MARKER_MCQ: &str = "**Question:** What is the chemical symbol for water?\n\
**Options:**\n\
1. H2O\n\
2. CO2\n\
3. NaCl\n\
4. O2\n\
**Correct Answer:** H2O";

pub const JSON_CHECKBOX: &str = r#"{
  "question": "Which of these are noble gases?",
  "options": ["Helium", "Oxygen", "Neon", "Nitrogen"],
  "correct_answers": [1, 3]
}"#;

pub const JSON_MCQ: &str = r#"{
  "question": "Which planet is known as the red planet?",
  "options": ["Venus", "Mars", "Jupiter", "Saturn"],
  "correct_answers": [2]
}"#;
