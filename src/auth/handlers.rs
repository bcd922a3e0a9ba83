use axum::{
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use minijinja::context;
use tower_sessions::Session;
use tracing::{error, info, instrument, warn};

use crate::{state::AppState, templates};

use super::dto::LoginForm;
use super::repo_types::User;
use super::session::{SessionUser, SESSION_USER_KEY};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(login_page).post(login))
        .route("/logout", post(logout))
}

#[instrument(skip(state))]
pub async fn login_page(State(state): State<AppState>) -> Html<String> {
    templates::render(&state, "login.html", context! { error => () })
}

#[instrument(skip(state, session, form))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    let username = form.username.trim();
    if username.is_empty() {
        warn!("login attempt with empty username");
        return templates::render(
            &state,
            "login.html",
            context! { error => "Username must not be empty" },
        )
        .into_response();
    }

    let user = match User::find_or_create(&state.db, username).await {
        Ok(u) => u,
        Err(e) => {
            error!(error = %e, username, "user lookup failed");
            return templates::render(
                &state,
                "login.html",
                context! { error => "Something went wrong, please try again" },
            )
            .into_response();
        }
    };

    let session_user = SessionUser {
        id: user.id,
        username: user.username.clone(),
    };
    if let Err(e) = session.insert(SESSION_USER_KEY, &session_user).await {
        error!(error = %e, user_id = %user.id, "failed to establish session");
        return templates::render(
            &state,
            "login.html",
            context! { error => "Something went wrong, please try again" },
        )
        .into_response();
    }

    info!(user_id = %user.id, username = %user.username, "user logged in");
    Redirect::to("/home").into_response()
}

#[instrument(skip(session))]
pub async fn logout(session: Session) -> Redirect {
    // Idempotent: flushing a session that was never created is a no-op.
    if let Err(e) = session.flush().await {
        error!(error = %e, "failed to clear session");
    }
    Redirect::to("/login")
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::extract::State;
    use axum::http::{header::LOCATION, StatusCode};
    use axum::response::IntoResponse;
    use axum::Form;
    use tower_sessions::{MemoryStore, Session};
    use uuid::Uuid;

    use crate::auth::dto::LoginForm;
    use crate::auth::session::{SessionUser, SESSION_USER_KEY};
    use crate::state::AppState;

    fn test_session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    #[tokio::test]
    async fn empty_username_renders_error_and_creates_no_session() {
        let state = AppState::fake();
        let session = test_session();

        let resp = super::login(
            State(state),
            session.clone(),
            Form(LoginForm {
                username: "   ".into(),
            }),
        )
        .await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(String::from_utf8_lossy(&body).contains("Username must not be empty"));

        let stored = session.get::<SessionUser>(SESSION_USER_KEY).await.unwrap();
        assert!(stored.is_none());
    }

    #[tokio::test]
    async fn logout_clears_session_and_redirects_to_login() {
        let session = test_session();
        session
            .insert(
                SESSION_USER_KEY,
                &SessionUser {
                    id: Uuid::new_v4(),
                    username: "alice".into(),
                },
            )
            .await
            .unwrap();

        let resp = super::logout(session.clone()).await.into_response();
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(resp.headers().get(LOCATION).unwrap(), "/login");

        let stored = session.get::<SessionUser>(SESSION_USER_KEY).await.unwrap();
        assert!(stored.is_none());
    }

    #[tokio::test]
    async fn logout_is_idempotent_without_a_session() {
        let resp = super::logout(test_session()).await.into_response();
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(resp.headers().get(LOCATION).unwrap(), "/login");
    }
}
