use axum::response::Html;
use minijinja::Environment;
use tracing::error;

use crate::state::AppState;

pub fn environment() -> Result<Environment<'static>, minijinja::Error> {
    let mut env = Environment::new();
    env.add_template("login.html", include_str!("../templates/login.html"))?;
    env.add_template("home.html", include_str!("../templates/home.html"))?;
    env.add_template("saved.html", include_str!("../templates/saved.html"))?;
    Ok(env)
}

/// Render a named template, degrading to a minimal page if rendering fails.
pub fn render(state: &AppState, name: &str, ctx: minijinja::Value) -> Html<String> {
    let page = state
        .templates
        .get_template(name)
        .and_then(|t| t.render(&ctx));
    match page {
        Ok(html) => Html(html),
        Err(e) => {
            error!(error = %e, template = name, "template render failed");
            Html("<h1>Something went wrong</h1>".into())
        }
    }
}
