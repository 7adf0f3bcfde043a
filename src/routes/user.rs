use std::sync::Arc;

use askama::Template;
use axum::{
    Extension, Form,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::SignedCookieJar;
use tracing::info;

use crate::{
    auth::{self, add_session_cookie, clear_session_cookie},
    config::AppConfig,
    errors::ApiError,
    models::{LoginForm, RegisterForm, User},
    router::AppState,
    routes::handle_render,
    templates::{LoginTemplate, RegisterTemplate},
};

fn validate_registration(form: &RegisterForm) -> Result<(), &'static str> {
    if !(2..=20).contains(&form.username.chars().count()) {
        return Err("Username must be between 2 and 20 characters");
    }
    let (local, domain) = form.email.split_once('@').unwrap_or(("", ""));
    if local.is_empty() || !domain.contains('.') || domain.starts_with('.') {
        return Err("Enter a valid email address");
    }
    if form.password.is_empty() {
        return Err("Password must not be empty");
    }
    if form.password != form.confirm_password {
        return Err("Passwords do not match");
    }
    Ok(())
}

fn render_register_error(message: &str) -> Result<Response, ApiError> {
    let template = RegisterTemplate {
        error: Some(message.to_string()),
    };
    let html = handle_render(template.render())?;
    Ok((StatusCode::BAD_REQUEST, html).into_response())
}

pub async fn show_register() -> Result<impl IntoResponse, ApiError> {
    handle_render(RegisterTemplate { error: None }.render())
}

pub async fn register(
    State(state): State<Arc<AppState>>,
    Form(form): Form<RegisterForm>,
) -> Result<Response, ApiError> {
    if let Err(message) = validate_registration(&form) {
        return render_register_error(message);
    }

    let password_hash = auth::hash_password(&form.password)?;
    let inserted = sqlx::query_as::<_, User>(
        "INSERT INTO users (username, email, password_hash) VALUES ($1, $2, $3) RETURNING *",
    )
    .bind(form.username.trim())
    .bind(form.email.trim())
    .bind(&password_hash)
    .fetch_one(&*state.db)
    .await;

    match inserted {
        Ok(user) => {
            info!("Registered user {} ({})", user.username, user.id);
            Ok(Redirect::to("/login").into_response())
        }
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            render_register_error("Username or email is already taken")
        }
        Err(e) => Err(e.into()),
    }
}

fn render_login_error() -> Result<Response, ApiError> {
    let template = LoginTemplate {
        error: Some("Login failed. Check your email and password.".to_string()),
    };
    let html = handle_render(template.render())?;
    Ok((StatusCode::UNAUTHORIZED, html).into_response())
}

pub async fn show_login() -> Result<impl IntoResponse, ApiError> {
    handle_render(LoginTemplate { error: None }.render())
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Extension(config): Extension<AppConfig>,
    headers: HeaderMap,
    Form(form): Form<LoginForm>,
) -> Result<Response, ApiError> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
        .bind(form.email.trim())
        .fetch_optional(&*state.db)
        .await?;

    // A missing account and a wrong password get the same answer; a corrupt
    // stored hash does not — that propagates as a 500.
    let verified = match &user {
        Some(user) => auth::verify_password(&user.password_hash, &form.password)?,
        None => false,
    };
    let Some(user) = user.filter(|_| verified) else {
        return render_login_error();
    };

    info!("User {} logged in", user.id);
    let cookies = SignedCookieJar::from_headers(&headers, config.cookie_secret.clone());
    let cookies = add_session_cookie(cookies, user.id);
    Ok((cookies, Redirect::to("/decks")).into_response())
}

pub async fn logout(
    Extension(config): Extension<AppConfig>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let cookies = SignedCookieJar::from_headers(&headers, config.cookie_secret.clone());
    let cookies = clear_session_cookie(cookies);
    Ok((cookies, Redirect::to("/")).into_response())
}
