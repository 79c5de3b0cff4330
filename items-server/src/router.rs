//! HTTP routes over the `TodoItem` collection.
//!
//! # Design
//! Each handler is a thin translation: extract, validate, call one
//! collection operation, wrap the result. Failures are `AppError`s and only
//! become status codes in `AppError::into_response`.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use memstore::{Collection, Document, Entity, Store};
use serde_json::Value;
use tracing::{debug, info};

use crate::error::AppError;
use crate::session::Session;
use crate::validate::{ItemPatch, NewItem};

/// Collection backing the router.
pub const COLLECTION: &str = "TodoItem";

/// Router for the items resource, rooted at `/`. Mount it under any prefix
/// with `Router::nest`.
pub fn items_router(store: Store) -> Router {
    Router::new()
        .route("/", get(list_items).post(create_item))
        .route(
            "/{key}",
            get(get_item)
                .put(replace_item)
                .patch(update_item)
                .delete(delete_item),
        )
        .with_state(store)
}

async fn items(store: &Store) -> Collection {
    store.collection(COLLECTION).await
}

async fn list_items(session: Session, State(store): State<Store>) -> Json<Vec<Entity>> {
    let result = items(&store).await.find().await;
    info!(user = %session.user_id, count = result.entities.len(), "list items");
    Json(result.entities)
}

async fn create_item(
    session: Session,
    State(store): State<Store>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Entity>), AppError> {
    let Json(body) = body?;
    let item = NewItem::from_value(body)?;
    let title = item.title().to_string();
    let saved = items(&store)
        .await
        .save(Document::new(item.into_fields()))
        .await;
    info!(user = %session.user_id, key = %saved.key, %title, "created item");
    Ok((StatusCode::CREATED, Json(saved)))
}

async fn get_item(
    _session: Session,
    State(store): State<Store>,
    Path(key): Path<String>,
) -> Result<Json<Entity>, AppError> {
    items(&store)
        .await
        .get(&key)
        .await
        .map(Json)
        .ok_or_else(|| AppError::item_not_found(&key))
}

async fn replace_item(
    session: Session,
    State(store): State<Store>,
    Path(key): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Entity>, AppError> {
    let Json(body) = body?;
    let item = NewItem::from_value(body)?;
    let updated = items(&store)
        .await
        .replace(&key, item.into_fields())
        .await
        .ok_or_else(|| AppError::item_not_found(&key))?;
    info!(user = %session.user_id, %key, "replaced item");
    Ok(Json(updated))
}

async fn update_item(
    session: Session,
    State(store): State<Store>,
    Path(key): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Entity>, AppError> {
    let Json(body) = body?;
    let patch = ItemPatch::from_value(body)?;
    if patch.is_empty() {
        debug!(%key, "empty patch");
    }
    let updated = items(&store)
        .await
        .merge(&key, patch.into_fields())
        .await
        .ok_or_else(|| AppError::item_not_found(&key))?;
    info!(user = %session.user_id, %key, "updated item");
    Ok(Json(updated))
}

/// Always 204; deleting a missing key is not an error.
async fn delete_item(
    session: Session,
    State(store): State<Store>,
    Path(key): Path<String>,
) -> StatusCode {
    let removed = items(&store).await.delete(&key).await;
    info!(user = %session.user_id, %key, removed, "deleted item");
    StatusCode::NO_CONTENT
}
