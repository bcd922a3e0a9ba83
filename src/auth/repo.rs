use sqlx::PgPool;

use super::repo_types::User;

impl User {
    /// Find a user by exact username.
    pub async fn find_by_username(db: &PgPool, username: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, created_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Find a user by username, creating the record on first login.
    ///
    /// The insert is conflict-tolerant so two concurrent first logins with the
    /// same username both resolve to the single stored row.
    pub async fn find_or_create(db: &PgPool, username: &str) -> anyhow::Result<User> {
        if let Some(user) = User::find_by_username(db, username).await? {
            return Ok(user);
        }

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username)
            VALUES ($1)
            ON CONFLICT (username) DO UPDATE SET username = EXCLUDED.username
            RETURNING id, username, created_at
            "#,
        )
        .bind(username)
        .fetch_one(db)
        .await?;
        Ok(user)
    }
}
