use std::io::Cursor;
use std::sync::{Arc, Mutex, PoisonError};

use bytes::Bytes;
use image::{imageops::FilterType, ImageFormat};

use crate::error::{Error, Result};
use crate::services::ai_service::{GeneratedImage, Generator};
use crate::services::prompt::image_prompt;
use crate::services::retry::RetryPolicy;
use crate::storage::image_store::{image_path, ImageStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

/// Question banner.
pub const BANNER_SIZE: ImageSize = ImageSize {
    width: 750,
    height: 319,
};

/// Option thumbnail, also used for sub-question illustrations.
pub const OPTION_SIZE: ImageSize = ImageSize {
    width: 270,
    height: 140,
};

/// Keys stored while one quiz is being built, so that a quiz which fails
/// part way can take its images back out of the store.
#[derive(Debug, Default)]
pub struct StoredKeys {
    keys: Mutex<Vec<String>>,
}

impl StoredKeys {
    fn record(&self, key: &str) {
        self.keys
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(key.to_string());
    }

    fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.keys.lock().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn len(&self) -> usize {
        self.keys.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Generates an image, downloads it, resizes it and keeps the PNG in the
/// image store.
#[derive(Clone)]
pub struct ImageService {
    generator: Arc<dyn Generator>,
    store: Arc<dyn ImageStore>,
    retry: RetryPolicy,
}

impl ImageService {
    pub fn new(
        generator: Arc<dyn Generator>,
        store: Arc<dyn ImageStore>,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            generator,
            store,
            retry,
        }
    }

    /// Removes every image recorded in `stored` and returns how many were
    /// still present.
    pub fn discard(&self, stored: &StoredKeys) -> usize {
        stored
            .take()
            .iter()
            .filter(|key| self.store.remove(key))
            .count()
    }

    /// Returns the store key of the materialized image.
    pub async fn materialize(
        &self,
        prompt: &str,
        size: ImageSize,
        collection: &str,
        stored: &StoredKeys,
    ) -> Result<String> {
        let generator = &self.generator;
        let png = self
            .retry
            .run("image generation", move |attempt| async move {
                let styled = image_prompt(prompt, attempt);
                tracing::info!(attempt, prompt = %styled, "Generating image");
                let raw = match generator.generate_image(&styled).await? {
                    GeneratedImage::Url(url) => generator.fetch_image(&url).await?,
                    GeneratedImage::Inline(bytes) => bytes,
                };
                resize_png(raw, size).await
            })
            .await?;

        let key = self.store.put(collection, png);
        stored.record(&key);
        tracing::info!(
            key = %key,
            collection,
            width = size.width,
            height = size.height,
            "Stored image"
        );
        Ok(key)
    }

    /// Like [`materialize`](Self::materialize) but for images a question can
    /// do without: failures are logged and yield `None` instead of an error.
    pub async fn materialize_optional(
        &self,
        prompt: &str,
        size: ImageSize,
        collection: &str,
        stored: &StoredKeys,
    ) -> Option<String> {
        match self.materialize(prompt, size, collection, stored).await {
            Ok(key) => Some(image_path(&key)),
            Err(e) => {
                tracing::warn!(error = %e, prompt, "Image unavailable, continuing without it");
                None
            }
        }
    }

    /// Materializes one image per prompt. Either every image is stored or,
    /// on the first failure, the ones already stored are removed again.
    pub async fn materialize_all(
        &self,
        prompts: &[String],
        size: ImageSize,
        collection: &str,
        stored: &StoredKeys,
    ) -> Result<Vec<String>> {
        let mut keys = Vec::with_capacity(prompts.len());
        for prompt in prompts {
            match self.materialize(prompt, size, collection, stored).await {
                Ok(key) => keys.push(key),
                Err(e) => {
                    for key in &keys {
                        self.store.remove(key);
                    }
                    return Err(e);
                }
            }
        }
        Ok(keys)
    }
}

/// Decodes, resizes and re-encodes off the async runtime.
pub async fn resize_png(raw: Bytes, size: ImageSize) -> Result<Bytes> {
    tokio::task::spawn_blocking(move || encode_resized(&raw, size))
        .await
        .map_err(|e| Error::Internal(format!("Image worker failed: {}", e)))?
}

pub fn encode_resized(raw: &[u8], size: ImageSize) -> Result<Bytes> {
    let decoded = image::load_from_memory(raw)?;
    let resized = decoded.resize_exact(size.width, size.height, FilterType::Lanczos3);
    let mut out = Cursor::new(Vec::new());
    resized
        .write_to(&mut out, ImageFormat::Png)
        .map_err(encode_error)?;
    Ok(Bytes::from(out.into_inner()))
}

/// Encoding our own resized buffer is a server fault, unlike a provider
/// payload that fails to decode.
fn encode_error(e: image::ImageError) -> Error {
    Error::Internal(format!("PNG encoding failed: {}", e))
}
