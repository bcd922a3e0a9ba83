use serde::Deserialize;

/// Form body for saving an image. The URL may be omitted, in which case the
/// session's last-fetched URL is used.
#[derive(Debug, Deserialize)]
pub struct SaveForm {
    pub image_url: Option<String>,
}
