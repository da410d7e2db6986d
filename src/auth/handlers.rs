use super::{Auth, Context, Error};
use crate::render::locale_from_request;
use axum::{
    extract::{Extension, Path, Request},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info, instrument};

pub const LOGIN_VIEW: &str = "auth/login.html";
pub const REGISTER_VIEW: &str = "auth/register.html";

pub(super) fn router(auth: Arc<Auth>) -> Router {
    Router::new()
        .route("/auth/login", get(login))
        .route("/auth/register", get(register_page))
        .route("/auth/:provider/register", post(register))
        .layer(Extension(auth))
}

async fn login(Extension(auth): Extension<Arc<Auth>>, request: Request) -> Response {
    page(&auth, LOGIN_VIEW, request)
}

async fn register_page(Extension(auth): Extension<Arc<Auth>>, request: Request) -> Response {
    page(&auth, REGISTER_VIEW, request)
}

fn page(auth: &Auth, view: &str, request: Request) -> Response {
    let (parts, _body) = request.into_parts();
    let locale = locale_from_request(&parts);
    match auth.render().render(
        view,
        &locale,
        json!({
            "providers": auth.provider_names(),
            "login_url": auth.config().login_url,
        }),
    ) {
        Ok(html) => Html(html).into_response(),
        Err(e) => Error::from(e).into_response(),
    }
}

#[instrument(skip(auth, request))]
async fn register(
    Extension(auth): Extension<Arc<Auth>>,
    Path(provider): Path<String>,
    request: Request,
) -> Response {
    let Some(handler) = auth.provider(&provider) else {
        return Error::ProviderNotFound(provider).into_response();
    };

    let mut ctx = Context::new(request);
    match handler.register(&mut ctx).await {
        Ok(claims) => {
            info!(provider = %claims.provider, "registered {}", claims.user_id);
            (StatusCode::CREATED, Json(claims)).into_response()
        }
        Err(e) => {
            debug!("registration failed: {}", e);
            e.into_response()
        }
    }
}
