//! Record shapes stored in, and read back from, the document store.

use std::fmt;

use bson::{Bson, Document};
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use validator::Validate;

use super::StoreError;

pub const BLOG_COLLECTION: &str = "blogpost";
pub const CONTACT_COLLECTION: &str = "contactmessage";

/// Opaque identifier assigned by the store at insert time.
///
/// Only its display form ever leaves the process: ObjectIds render as
/// their 24-character hex string, string ids as themselves.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentId(Bson);

impl DocumentId {
    pub fn new(raw: Bson) -> Self {
        Self(raw)
    }

    pub fn as_bson(&self) -> &Bson {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Bson::ObjectId(oid) => f.write_str(&oid.to_hex()),
            Bson::String(s) => f.write_str(s),
            other => write!(f, "{}", other),
        }
    }
}

/// Blog post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct BlogPost {
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: String,
    pub slug: String,
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default = "default_published")]
    pub published: bool,
}

fn default_published() -> bool {
    true
}

/// Contact form submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ContactMessage {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[validate(length(min = 1, message = "message must not be empty"))]
    pub message: String,
}

/// A raw document read back from the store, split into its identifier,
/// its timestamps and its typed fields.
#[derive(Debug, Clone)]
pub struct StoredDocument<T> {
    pub id: DocumentId,
    pub created_at: Option<bson::DateTime>,
    pub updated_at: Option<bson::DateTime>,
    pub fields: T,
}

impl<T: DeserializeOwned> TryFrom<Document> for StoredDocument<T> {
    type Error = StoreError;

    fn try_from(mut document: Document) -> Result<Self, Self::Error> {
        let id = document
            .remove("_id")
            .map(DocumentId::new)
            .ok_or(StoreError::MissingId)?;
        let created_at = take_datetime(&mut document, "created_at");
        let updated_at = take_datetime(&mut document, "updated_at");
        let fields = bson::from_document(document)?;

        Ok(Self {
            id,
            created_at,
            updated_at,
            fields,
        })
    }
}

fn take_datetime(document: &mut Document, key: &str) -> Option<bson::DateTime> {
    match document.remove(key) {
        Some(Bson::DateTime(dt)) => Some(dt),
        _ => None,
    }
}

/// The client-facing form of a stored record: the identifier is rendered
/// to a string under `id` and the internal `_id` key is gone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicDocument<T> {
    pub id: String,
    #[serde(flatten)]
    pub fields: T,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl<T> From<StoredDocument<T>> for PublicDocument<T> {
    fn from(stored: StoredDocument<T>) -> Self {
        Self {
            id: stored.id.to_string(),
            fields: stored.fields,
            created_at: stored.created_at.map(|dt| dt.to_chrono()),
            updated_at: stored.updated_at.map(|dt| dt.to_chrono()),
        }
    }
}
