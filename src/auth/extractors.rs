use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
    response::Redirect,
};
use tower_sessions::Session;
use tracing::error;

use super::session::{SessionUser, SESSION_USER_KEY};

/// Extracts the logged-in user from the session.
///
/// Rejection is a silent redirect to the login page, which makes this the
/// login gate for every route that takes it as an argument.
pub struct CurrentUser(pub SessionUser);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = Redirect;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|_| Redirect::to("/login"))?;

        match session.get::<SessionUser>(SESSION_USER_KEY).await {
            Ok(Some(user)) => Ok(CurrentUser(user)),
            Ok(None) => Err(Redirect::to("/login")),
            Err(e) => {
                error!(error = %e, "failed to read session");
                Err(Redirect::to("/login"))
            }
        }
    }
}
