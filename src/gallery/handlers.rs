use axum::{
    extract::State,
    response::{Html, Redirect},
    routing::{get, post},
    Form, Router,
};
use minijinja::context;
use time::format_description::well_known::Rfc3339;
use tower_sessions::Session;
use tracing::{error, info, instrument};

use crate::{
    auth::extractors::CurrentUser,
    auth::session::LAST_IMAGE_KEY,
    state::AppState,
    templates,
};

use super::dto::SaveForm;
use super::repo_types::SavedImage;

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/home", get(home))
        .route("/random", get(fetch_random))
        .route("/saved", get(saved_images))
}

pub fn write_routes() -> Router<AppState> {
    Router::new().route("/save", post(save_image))
}

#[instrument(skip(state, session))]
pub async fn home(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    session: Session,
) -> Html<String> {
    let image_url = last_image_url(&session).await;
    templates::render(
        &state,
        "home.html",
        context! { username => user.username, image_url => image_url, error => () },
    )
}

#[instrument(skip(state, session))]
pub async fn fetch_random(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    session: Session,
) -> Html<String> {
    match state.dog_api.random_image_url().await {
        Ok(url) => {
            if let Err(e) = session.insert(LAST_IMAGE_KEY, &url).await {
                error!(error = %e, "failed to store image url in session");
            }
            templates::render(
                &state,
                "home.html",
                context! { username => user.username, image_url => url, error => () },
            )
        }
        Err(e) => {
            error!(error = %e, "random image fetch failed");
            templates::render(
                &state,
                "home.html",
                context! {
                    username => user.username,
                    image_url => (),
                    error => "Could not fetch a dog image right now, please try again",
                },
            )
        }
    }
}

#[instrument(skip(state, session, form))]
pub async fn save_image(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    session: Session,
    Form(form): Form<SaveForm>,
) -> Redirect {
    let from_session = last_image_url(&session).await;
    let Some(url) = resolve_image_url(form.image_url.as_deref(), from_session.as_deref()) else {
        return Redirect::to("/home");
    };

    match SavedImage::insert(&state.db, user.id, &url).await {
        Ok(image) => {
            info!(user_id = %user.id, image_id = %image.id, "image saved");
            Redirect::to("/saved")
        }
        Err(e) => {
            error!(error = %e, user_id = %user.id, "failed to save image");
            Redirect::to("/home")
        }
    }
}

#[instrument(skip(state))]
pub async fn saved_images(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Html<String> {
    let images = match SavedImage::list_for_user(&state.db, user.id).await {
        Ok(rows) => rows,
        Err(e) => {
            error!(error = %e, user_id = %user.id, "listing saved images failed");
            Vec::new()
        }
    };

    let views: Vec<_> = images
        .into_iter()
        .map(|img| {
            let saved_at = img
                .saved_at
                .format(&Rfc3339)
                .unwrap_or_else(|_| img.saved_at.to_string());
            context! { image_url => img.image_url, saved_at => saved_at }
        })
        .collect();

    templates::render(
        &state,
        "saved.html",
        context! { username => user.username, images => views },
    )
}

async fn last_image_url(session: &Session) -> Option<String> {
    match session.get::<String>(LAST_IMAGE_KEY).await {
        Ok(url) => url,
        Err(e) => {
            error!(error = %e, "failed to read session");
            None
        }
    }
}

/// Resolve the URL to save: the form field wins, the session's last-fetched
/// URL is the fallback, and whitespace-only values count as absent.
pub(crate) fn resolve_image_url(form: Option<&str>, session: Option<&str>) -> Option<String> {
    form.map(str::trim)
        .filter(|s| !s.is_empty())
        .or_else(|| session.map(str::trim).filter(|s| !s.is_empty()))
        .map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::async_trait;
    use axum::extract::State;
    use tower_sessions::{MemoryStore, Session};
    use uuid::Uuid;

    use crate::auth::extractors::CurrentUser;
    use crate::auth::session::{SessionUser, LAST_IMAGE_KEY};
    use crate::gallery::provider::{ProviderError, RandomImageClient};
    use crate::state::AppState;

    use super::resolve_image_url;

    struct FailingDogApi;

    #[async_trait]
    impl RandomImageClient for FailingDogApi {
        async fn random_image_url(&self) -> Result<String, ProviderError> {
            Err(ProviderError::MalformedPayload("boom".into()))
        }
    }

    fn test_session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    fn test_user() -> CurrentUser {
        CurrentUser(SessionUser {
            id: Uuid::new_v4(),
            username: "alice".into(),
        })
    }

    #[test]
    fn form_field_wins_over_session() {
        let url = resolve_image_url(Some("https://x/form.jpg"), Some("https://x/session.jpg"));
        assert_eq!(url.as_deref(), Some("https://x/form.jpg"));
    }

    #[test]
    fn falls_back_to_session_url() {
        assert_eq!(
            resolve_image_url(None, Some("https://x/session.jpg")).as_deref(),
            Some("https://x/session.jpg")
        );
        assert_eq!(
            resolve_image_url(Some("   "), Some("https://x/session.jpg")).as_deref(),
            Some("https://x/session.jpg")
        );
    }

    #[test]
    fn no_resolvable_url() {
        assert_eq!(resolve_image_url(None, None), None);
        assert_eq!(resolve_image_url(Some(" "), Some("")), None);
    }

    #[tokio::test]
    async fn fetch_random_stores_url_in_session() {
        let state = AppState::fake();
        let session = test_session();

        let page = super::fetch_random(State(state), test_user(), session.clone()).await;
        assert!(page.0.contains("https://fake.local/dog.jpg"));

        let stored = session.get::<String>(LAST_IMAGE_KEY).await.unwrap();
        assert_eq!(stored.as_deref(), Some("https://fake.local/dog.jpg"));
    }

    #[tokio::test]
    async fn fetch_random_failure_leaves_session_unchanged() {
        let base = AppState::fake();
        let state = AppState::from_parts(
            base.db.clone(),
            base.config.clone(),
            base.templates.clone(),
            Arc::new(FailingDogApi),
        );

        let session = test_session();
        session
            .insert(LAST_IMAGE_KEY, &"https://x/before.jpg".to_string())
            .await
            .unwrap();

        let page = super::fetch_random(State(state), test_user(), session.clone()).await;
        assert!(page.0.contains("Could not fetch a dog image"));
        assert!(!page.0.contains("<img"));

        let stored = session.get::<String>(LAST_IMAGE_KEY).await.unwrap();
        assert_eq!(stored.as_deref(), Some("https://x/before.jpg"));
    }

    #[tokio::test]
    async fn home_shows_last_fetched_image() {
        let state = AppState::fake();
        let session = test_session();
        session
            .insert(LAST_IMAGE_KEY, &"https://x/a.jpg".to_string())
            .await
            .unwrap();

        let page = super::home(State(state), test_user(), session).await;
        assert!(page.0.contains("https://x/a.jpg"));
        assert!(page.0.contains("alice"));
    }
}
