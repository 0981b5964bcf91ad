/**
 * Contact Routes
 * Accepts contact form submissions
 */
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::db::{
    self,
    models::{ContactMessage, CONTACT_COLLECTION},
};
use crate::error::{AppError, AppResult};
use crate::routes::extract::ValidatedJson;
use crate::routes::AppState;

/// Response for POST /api/contact
#[derive(Debug, Serialize, Deserialize)]
pub struct ContactReceipt {
    pub id: String,
    pub status: String,
}

/// POST /api/contact - Store a contact message
pub async fn submit_contact(
    State(state): State<AppState>,
    ValidatedJson(msg): ValidatedJson<ContactMessage>,
) -> AppResult<Json<ContactReceipt>> {
    let store = state.store()?;

    let id = db::create_document(store, CONTACT_COLLECTION, &msg)
        .await
        .map_err(|e| {
            tracing::error!("Database error storing contact message: {}", e);
            AppError::from(e)
        })?;

    tracing::info!(id = %id, "contact message received");
    Ok(Json(ContactReceipt {
        id: id.to_string(),
        status: "received".to_string(),
    }))
}
