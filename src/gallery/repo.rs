use sqlx::PgPool;
use uuid::Uuid;

use super::repo_types::SavedImage;

impl SavedImage {
    /// Insert a saved image owned by the given user.
    pub async fn insert(db: &PgPool, user_id: Uuid, image_url: &str) -> anyhow::Result<SavedImage> {
        let image = sqlx::query_as::<_, SavedImage>(
            r#"
            INSERT INTO saved_images (user_id, image_url)
            VALUES ($1, $2)
            RETURNING id, user_id, image_url, saved_at
            "#,
        )
        .bind(user_id)
        .bind(image_url)
        .fetch_one(db)
        .await?;
        Ok(image)
    }

    /// List a user's saved images, most recent first.
    pub async fn list_for_user(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<SavedImage>> {
        let rows = sqlx::query_as::<_, SavedImage>(
            r#"
            SELECT id, user_id, image_url, saved_at
            FROM saved_images
            WHERE user_id = $1
            ORDER BY saved_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }
}
