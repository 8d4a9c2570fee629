use std::collections::BTreeMap;

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Json, Response},
};

use crate::dto::quiz_dto::{DeleteImagesQuery, DeleteImagesResponse, ListImagesQuery};
use crate::error::{Error, Result};
use crate::storage::image_store::image_path;
use crate::AppState;

#[axum::debug_handler]
pub async fn get_image(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Response> {
    let image = state
        .image_store
        .get(&key)
        .ok_or_else(|| Error::NotFound(format!("Image not found: {}", key)))?;

    let last_modified = image
        .created_at
        .format("%a, %d %b %Y %H:%M:%S GMT")
        .to_string();

    Ok((
        [
            (header::CONTENT_TYPE, image.content_type.to_string()),
            (header::LAST_MODIFIED, last_modified),
        ],
        image.bytes,
    )
        .into_response())
}

/// Lookup paths grouped by collection, optionally narrowed to one quiz type.
#[axum::debug_handler]
pub async fn list_all_images(
    State(state): State<AppState>,
    Query(params): Query<ListImagesQuery>,
) -> Result<Json<BTreeMap<String, Vec<String>>>> {
    let to_paths = |keys: Vec<String>| keys.iter().map(|k| image_path(k)).collect::<Vec<_>>();

    let listing = match params.quiz_type()? {
        Some(quiz_type) => {
            let collection = quiz_type.collection();
            let keys = state.image_store.keys(&collection);
            BTreeMap::from([(collection, to_paths(keys))])
        }
        None => state
            .image_store
            .collections()
            .into_iter()
            .map(|(collection, keys)| (collection, to_paths(keys)))
            .collect(),
    };

    Ok(Json(listing))
}

#[axum::debug_handler]
pub async fn delete_images(
    State(state): State<AppState>,
    Query(params): Query<DeleteImagesQuery>,
) -> Result<Json<DeleteImagesResponse>> {
    let range = params.into_range()?;
    let collection = range.quiz_type.collection();
    let deleted = state
        .image_store
        .delete_range(&collection, range.start, range.end);

    tracing::info!(
        collection = %collection,
        start = range.start,
        end = range.end,
        deleted = deleted.len(),
        "Deleted images"
    );

    Ok(Json(DeleteImagesResponse {
        message: "Images deleted successfully".to_string(),
        deleted,
    }))
}
