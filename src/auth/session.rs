use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Session key holding the logged-in user.
pub const SESSION_USER_KEY: &str = "user";

/// Session key holding the last-fetched image URL.
pub const LAST_IMAGE_KEY: &str = "last_image_url";

/// Identity stored in the session cookie store after login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: Uuid,
    pub username: String,
}
