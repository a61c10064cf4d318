use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{error, info, instrument, warn};

use crate::{
    auth::{
        dto::{AuthResponse, LoginRequest, PublicUser, RefreshRequest, RegisterRequest},
        extractors::{AuthUser, Identity},
        jwt::JwtKeys,
        password::{hash_password, verify_password},
        repo::CreateUserError,
        repo_types::User,
        services::{role_for_email, validate_registration},
    },
    error::AppError,
    extract::AppJson,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me))
}

impl From<CreateUserError> for AppError {
    fn from(e: CreateUserError) -> Self {
        match e {
            CreateUserError::EmailTaken => {
                AppError::Conflict("User with this email already exists.".into())
            }
            CreateUserError::Database(e) => {
                AppError::Internal(anyhow::Error::new(e).context("insert user"))
            }
        }
    }
}

fn issue_tokens(state: &AppState, user: User) -> Result<AuthResponse, AppError> {
    let keys = JwtKeys::from_ref(state);
    let access_token = keys.sign_access(&user).map_err(|e| {
        error!(error = %e, "jwt sign access failed");
        AppError::Internal(e)
    })?;
    let refresh_token = keys.sign_refresh(&user).map_err(|e| {
        error!(error = %e, "jwt sign refresh failed");
        AppError::Internal(e)
    })?;
    let is_admin = state.config.admin.is_admin(&Identity {
        user_id: user.id,
        email: user.email.clone(),
        role: user.role,
    });
    Ok(AuthResponse {
        access_token,
        refresh_token,
        user: PublicUser::new(&user, is_admin),
    })
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    AppJson(mut payload): AppJson<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    if let Err(errors) = validate_registration(&mut payload) {
        warn!(fields = ?errors.keys().collect::<Vec<_>>(), "invalid registration");
        return Err(AppError::Validation {
            message: "Invalid input.".into(),
            errors,
        });
    }

    if User::find_by_email(&state.db, &payload.email).await?.is_some() {
        warn!(email = %payload.email, "email already registered");
        return Err(CreateUserError::EmailTaken.into());
    }

    let hash = hash_password(&payload.password)?;
    let role = role_for_email(&state.config.admin, &payload.email);
    let user = User::create(&state.db, &payload.name, &payload.email, &hash, role)
        .await
        .map_err(|e| {
            if matches!(e, CreateUserError::EmailTaken) {
                warn!(email = %payload.email, "email registered concurrently");
            }
            AppError::from(e)
        })?;

    info!(user_id = %user.id, email = %user.email, role = ?user.role, "user registered");
    Ok((StatusCode::CREATED, Json(issue_tokens(&state, user)?)))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    AppJson(mut payload): AppJson<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    payload.email = payload.email.trim().to_lowercase();
    let invalid = || AppError::Unauthenticated("Invalid credentials".into());

    let Some(user) = User::find_by_email(&state.db, &payload.email).await? else {
        warn!(email = %payload.email, "login unknown email");
        return Err(invalid());
    };

    if !verify_password(&payload.password, &user.password_hash)? {
        warn!(user_id = %user.id, "login invalid password");
        return Err(invalid());
    }

    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok(Json(issue_tokens(&state, user)?))
}

#[instrument(skip(state, payload))]
pub async fn refresh(
    State(state): State<AppState>,
    AppJson(payload): AppJson<RefreshRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let keys = JwtKeys::from_ref(&state);
    let claims = keys
        .verify_refresh(&payload.refresh_token)
        .map_err(|e| AppError::Unauthenticated(e.to_string()))?;

    let user = User::find_by_id(&state.db, claims.sub)
        .await?
        .ok_or_else(|| AppError::Unauthenticated("User not found".into()))?;

    Ok(Json(issue_tokens(&state, user)?))
}

#[instrument(skip(state, identity), fields(user_id = %identity.user_id))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
) -> Result<Json<PublicUser>, AppError> {
    let user = User::find_by_id(&state.db, identity.user_id)
        .await?
        .ok_or_else(|| {
            error!(user_id = %identity.user_id, "user not found");
            AppError::Unauthenticated("User not found".into())
        })?;
    let is_admin = state.config.admin.is_admin(&identity);
    Ok(Json(PublicUser::new(&user, is_admin)))
}
