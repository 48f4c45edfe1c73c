use std::sync::Arc;

use axum::Router;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::get;
use serde::Serialize;
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::app::book_store::BookStore;
use crate::app::error::{StoreError, ValidationError, WriteOp};
use crate::app::model::{BookFilter, BookInput};

#[derive(Clone)]
pub struct AppState {
    pub book_store: Arc<dyn BookStore>,
}

impl AppState {
    pub fn new(book_store: Arc<dyn BookStore>) -> Self {
        Self { book_store }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ResponseStatus {
    Success,
    Fail,
    Error,
}

/// JSON envelope shared by every `/books` response.
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse {
    pub status: ResponseStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl ApiResponse {
    pub fn success(message: Option<&str>, data: Option<serde_json::Value>) -> Self {
        Self {
            status: ResponseStatus::Success,
            message: message.map(str::to_owned),
            data,
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Fail,
            message: Some(message.into()),
            data: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Error,
            message: Some(message.into()),
            data: None,
        }
    }
}

type ApiResult = Result<(StatusCode, Json<ApiResponse>), StoreError>;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(|| async { "ok\n" }))
        .route("/books", get(list_books).post(add_book))
        .route(
            "/books/:book_id",
            get(get_book).put(update_book).delete(delete_book),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn add_book(
    State(state): State<AppState>,
    payload: Result<Json<BookInput>, JsonRejection>,
) -> ApiResult {
    let input = body_or_reject(WriteOp::Add, payload)?;
    let book_id = state.book_store.add(input).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some("Book added"),
            Some(json!({ "bookId": book_id })),
        )),
    ))
}

async fn list_books(
    State(state): State<AppState>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> (StatusCode, Json<ApiResponse>) {
    let filter = match query {
        Ok(Query(pairs)) => BookFilter::from_pairs(pairs),
        Err(rejection) => {
            tracing::debug!(error = %rejection.body_text(), "ignoring unparsable query");
            BookFilter::default()
        }
    };
    let books = state.book_store.list(&filter).await;
    (
        StatusCode::OK,
        Json(ApiResponse::success(None, Some(json!({ "books": books })))),
    )
}

async fn get_book(State(state): State<AppState>, Path(book_id): Path<String>) -> ApiResult {
    let book = state.book_store.get(&book_id).await?;
    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(None, Some(json!({ "book": book })))),
    ))
}

async fn update_book(
    State(state): State<AppState>,
    Path(book_id): Path<String>,
    payload: Result<Json<BookInput>, JsonRejection>,
) -> ApiResult {
    let input = body_or_reject(WriteOp::Update, payload)?;
    state.book_store.update(&book_id, input).await?;
    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(Some("Book updated"), None)),
    ))
}

async fn delete_book(State(state): State<AppState>, Path(book_id): Path<String>) -> ApiResult {
    state.book_store.delete(&book_id).await?;
    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(Some("Book deleted"), None)),
    ))
}

fn body_or_reject(
    op: WriteOp,
    payload: Result<Json<BookInput>, JsonRejection>,
) -> Result<BookInput, StoreError> {
    payload.map(|Json(input)| input).map_err(|rejection| {
        StoreError::validation(op, ValidationError::InvalidBody(rejection.body_text()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_omits_absent_fields() {
        let value = serde_json::to_value(ApiResponse::success(None, None)).unwrap();
        assert_eq!(value, json!({ "status": "success" }));

        let value = serde_json::to_value(ApiResponse::fail("nope")).unwrap();
        assert_eq!(value, json!({ "status": "fail", "message": "nope" }));
    }
}
