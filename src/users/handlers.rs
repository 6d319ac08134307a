use axum::{
    extract::{Path, State},
    routing::{get, post, put},
    Json, Router,
};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{error::ApiError, state::AppState};

use super::dto::{
    CredentialsRequest, ListUpdateRequest, SuccessResponse, UserDataResponse, UserIdResponse,
};
use super::password::{hash_password, verify_password};
use super::repo::{User, UserList};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/check_login", post(check_login))
        .route("/:id", get(get_user_data))
        .route("/:user_id/like/:video_id", put(update_likes))
        .route("/:user_id/watch-later/:video_id", put(update_watch_later))
}

// Prefix match, not anchored at the end: a name is accepted as long as it
// STARTS with a run of allowed characters, so "foo!" passes while "!foo"
// does not. This mirrors the service's historical validation pattern.
pub(crate) fn is_valid_name(name: &str) -> bool {
    lazy_static! {
        static ref NAME_RE: Regex = Regex::new(r"^[A-Za-z0-9_-]+").unwrap();
    }
    NAME_RE.is_match(name)
}

// Counted in characters, not bytes: a multibyte password is as long as
// the user typed it.
pub(crate) fn is_valid_password(password: &str) -> bool {
    password.chars().count() >= 8
}

fn parse_user_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::InvalidInput("Invalid user ID".into()))
}

fn parse_video_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::InvalidInput("Invalid video ID".into()))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<CredentialsRequest>,
) -> Result<Json<UserIdResponse>, ApiError> {
    if !is_valid_name(&payload.name) {
        warn!(name = %payload.name, "invalid username");
        return Err(ApiError::InvalidInput(
            "Username must contain only letters, numbers, underscores, and dashes".into(),
        ));
    }

    if !is_valid_password(&payload.password) {
        warn!("password too short");
        return Err(ApiError::InvalidInput(
            "Password must be at least 8 characters long".into(),
        ));
    }

    // Check-then-insert: a concurrent registration of the same name can
    // slip between the lookup and the insert. Known gap, kept as-is.
    if User::name_exists(&state.db, &payload.name).await? {
        warn!(name = %payload.name, "username already registered");
        return Err(ApiError::Conflict(
            "The specified username already exists".into(),
        ));
    }

    let hash = hash_password(&payload.password)?;
    let user = User::create(&state.db, &payload.name, &hash).await?;

    info!(user_id = %user.id, name = %user.name, "user registered");
    Ok(Json(UserIdResponse { id: user.id }))
}

#[instrument(skip(state, payload))]
pub async fn check_login(
    State(state): State<AppState>,
    Json(payload): Json<CredentialsRequest>,
) -> Result<Json<UserIdResponse>, ApiError> {
    let user = match User::find_by_name(&state.db, &payload.name).await? {
        Some(u) => u,
        None => {
            warn!(name = %payload.name, "login unknown username");
            return Err(ApiError::NotFound);
        }
    };

    if !verify_password(&payload.password, &user.password_hash)? {
        warn!(name = %payload.name, user_id = %user.id, "login invalid password");
        return Err(ApiError::Unauthorized);
    }

    info!(user_id = %user.id, name = %user.name, "user logged in");
    Ok(Json(UserIdResponse { id: user.id }))
}

#[instrument(skip(state))]
pub async fn get_user_data(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UserDataResponse>, ApiError> {
    let id = parse_user_id(&id)?;

    let user = User::find_by_id(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(UserDataResponse {
        likes: user.likes,
        watch_later: user.watch_later,
    }))
}

#[instrument(skip(state, payload))]
pub async fn update_likes(
    State(state): State<AppState>,
    Path((user_id, video_id)): Path<(String, String)>,
    Json(payload): Json<ListUpdateRequest>,
) -> Result<Json<SuccessResponse>, ApiError> {
    apply_list_update(&state, UserList::Likes, &user_id, &video_id, payload).await
}

#[instrument(skip(state, payload))]
pub async fn update_watch_later(
    State(state): State<AppState>,
    Path((user_id, video_id)): Path<(String, String)>,
    Json(payload): Json<ListUpdateRequest>,
) -> Result<Json<SuccessResponse>, ApiError> {
    apply_list_update(&state, UserList::WatchLater, &user_id, &video_id, payload).await
}

async fn apply_list_update(
    state: &AppState,
    list: UserList,
    user_id: &str,
    video_id: &str,
    payload: ListUpdateRequest,
) -> Result<Json<SuccessResponse>, ApiError> {
    let user_id = parse_user_id(user_id)?;
    let video_id = parse_video_id(video_id)?;

    let matched = User::update_list(&state.db, user_id, list, video_id, payload.update).await?;
    if !matched {
        warn!(%user_id, "list update for unknown user");
        return Err(ApiError::NotFound);
    }

    info!(%user_id, %video_id, ?list, op = ?payload.update, "list updated");
    Ok(Json(SuccessResponse::ok()))
}
