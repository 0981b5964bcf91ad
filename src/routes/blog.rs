/**
 * Blog Routes
 * Create, list and fetch blog posts
 */
use axum::{
    extract::{Path, State},
    Json,
};
use bson::{doc, Document};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::db::{
    self,
    models::{BlogPost, PublicDocument, StoredDocument, BLOG_COLLECTION},
    StoreError,
};
use crate::error::{AppError, AppResult};
use crate::routes::extract::{ValidatedJson, ValidatedQuery};
use crate::routes::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query parameters for GET /api/blogs (list)
#[derive(Debug, Deserialize, Validate)]
pub struct BlogListQuery {
    pub tag: Option<String>,
    #[serde(default = "default_limit")]
    #[validate(range(min = 0, message = "limit must not be negative"))]
    pub limit: i64,
}

fn default_limit() -> i64 {
    10
}

impl BlogListQuery {
    /// Published posts, narrowed to one tag when a non-empty tag is given.
    fn filter(&self) -> Document {
        let mut filter = doc! { "published": true };
        if let Some(tag) = self.tag.as_deref().filter(|t| !t.is_empty()) {
            filter.insert("tags", tag);
        }
        filter
    }
}

/// Response for POST /api/blogs
#[derive(Debug, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub id: String,
}

pub type BlogPostResponse = PublicDocument<BlogPost>;

fn storage_error(action: &'static str) -> impl Fn(StoreError) -> AppError {
    move |e| {
        tracing::error!("Database error {}: {}", action, e);
        AppError::from(e)
    }
}

fn to_response(document: Document) -> Result<BlogPostResponse, StoreError> {
    StoredDocument::<BlogPost>::try_from(document).map(PublicDocument::from)
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/blogs - Create a blog post
pub async fn create_blog(
    State(state): State<AppState>,
    ValidatedJson(post): ValidatedJson<BlogPost>,
) -> AppResult<Json<CreatedResponse>> {
    let store = state.store().map_err(storage_error("creating blog post"))?;

    let id = db::create_document(store, BLOG_COLLECTION, &post)
        .await
        .map_err(storage_error("creating blog post"))?;

    tracing::info!(id = %id, slug = %post.slug, "blog post created");
    Ok(Json(CreatedResponse { id: id.to_string() }))
}

/// GET /api/blogs - List published blog posts, optionally by tag
pub async fn list_blogs(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<BlogListQuery>,
) -> AppResult<Json<Vec<BlogPostResponse>>> {
    let store = state.store().map_err(storage_error("listing blog posts"))?;

    let documents = db::get_documents(store, BLOG_COLLECTION, query.filter(), query.limit)
        .await
        .map_err(storage_error("listing blog posts"))?;

    let posts = documents
        .into_iter()
        .map(to_response)
        .collect::<Result<Vec<_>, _>>()
        .map_err(storage_error("reading blog posts"))?;

    Ok(Json(posts))
}

/// GET /api/blogs/{slug_or_id} - Fetch one post by slug, else by raw `_id`
///
/// The second lookup compares the path segment to `_id` as a plain string.
/// Posts whose `_id` is an ObjectId are therefore only reachable by slug.
pub async fn get_blog(
    State(state): State<AppState>,
    Path(slug_or_id): Path<String>,
) -> AppResult<Json<BlogPostResponse>> {
    let store = state.store().map_err(storage_error("fetching blog post"))?;

    let by_slug = doc! { "slug": slug_or_id.as_str() };
    let mut documents = db::get_documents(store, BLOG_COLLECTION, by_slug, 1)
        .await
        .map_err(storage_error("fetching blog post"))?;

    if documents.is_empty() {
        let by_id = doc! { "_id": slug_or_id.as_str() };
        documents = db::get_documents(store, BLOG_COLLECTION, by_id, 1)
            .await
            .map_err(storage_error("fetching blog post"))?;
    }

    let document = documents
        .into_iter()
        .next()
        .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;

    let post = to_response(document).map_err(storage_error("reading blog post"))?;
    Ok(Json(post))
}
