pub mod config;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod storage;
pub mod utils;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use reqwest::Client;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::middleware::cors::api_cors;
use crate::middleware::rate_limit::{new_rps_state, rps_middleware};
use crate::services::{
    ai_service::{AIService, Generator},
    image_service::ImageService,
    quiz_service::QuizService,
};
use crate::storage::image_store::{ImageStore, InMemoryImageStore};

#[derive(Clone)]
pub struct AppState {
    pub quiz_service: QuizService,
    pub image_store: Arc<dyn ImageStore>,
}

impl AppState {
    pub fn new(config: &Config) -> error::Result<Self> {
        let http_client = Client::builder()
            .timeout(config.upstream_timeout())
            .build()?;
        let generator: Arc<dyn Generator> = Arc::new(AIService::new(config, http_client));
        Ok(Self::with_generator(config, generator))
    }

    pub fn with_generator(config: &Config, generator: Arc<dyn Generator>) -> Self {
        let store: Arc<dyn ImageStore> =
            Arc::new(InMemoryImageStore::new(config.image_store_capacity));
        Self::with_parts(config, generator, store)
    }

    pub fn with_parts(
        config: &Config,
        generator: Arc<dyn Generator>,
        image_store: Arc<dyn ImageStore>,
    ) -> Self {
        let retry = config.retry_policy();
        let images = ImageService::new(generator.clone(), image_store.clone(), retry);
        let quiz_service = QuizService::new(generator, images, retry, config.max_questions);

        Self {
            quiz_service,
            image_store,
        }
    }
}

/// Full HTTP surface of the service.
pub fn app(state: AppState, config: &Config) -> Router {
    let base_routes = Router::new().route("/health", get(routes::health::health));

    let quiz_api = Router::new()
        .route("/generate_quiz", get(routes::quiz::generate_quiz))
        .route("/api/quiz", post(routes::quiz::create_quiz))
        .route("/api/quiz/types", get(routes::quiz::list_quiz_types))
        .layer(axum::middleware::from_fn_with_state(
            new_rps_state(config.public_rps),
            rps_middleware,
        ));

    let image_api = Router::new()
        .route("/image/:key", get(routes::images::get_image))
        .route("/list_all_images", get(routes::images::list_all_images))
        .route(
            "/delete_images",
            get(routes::images::delete_images).post(routes::images::delete_images),
        )
        .layer(axum::middleware::from_fn_with_state(
            new_rps_state(config.public_rps),
            rps_middleware,
        ));

    base_routes
        .merge(quiz_api)
        .merge(image_api)
        .with_state(state)
        .layer(api_cors())
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(1024 * 1024))
}
