use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::{
    AppState,
    error::AppError,
    utils::{extractors::extract_bearer_token, jwt::Claims, policy},
};

fn authenticate(state: &AppState, req: &Request) -> Result<Claims, AppError> {
    let token = extract_bearer_token(req.headers())?;
    state.tokens.verify(token)
}

pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let claims = authenticate(&state, &req)?;

    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

pub async fn admin_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let claims = authenticate(&state, &req)?;

    policy::require_admin(&claims)?;

    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}
