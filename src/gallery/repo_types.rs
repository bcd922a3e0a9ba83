use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// A saved-image record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SavedImage {
    pub id: Uuid,
    pub user_id: Uuid,
    pub image_url: String,
    pub saved_at: OffsetDateTime,
}
