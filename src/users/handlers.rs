use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use time::OffsetDateTime;
use tracing::{error, info, instrument, warn};

use crate::{
    auth::jwt::AuthUser,
    state::AppState,
    streak::update_streak,
    users::{
        dto::{Lang, LanguageResponse, MeResponse, StreakResponse, UpdateLanguageRequest},
        repo::User,
    },
};

pub fn profile_routes() -> Router<AppState> {
    Router::new()
        .route("/me", get(me))
        .route("/language", post(update_language))
        .route("/streak", post(streak))
}

#[instrument(skip(state))]
pub async fn me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<MeResponse>, (StatusCode, String)> {
    let user = User::find_by_id(&state.db, user_id)
        .await
        .map_err(internal)?
        .ok_or_else(|| {
            warn!(user_id = %user_id, "token for missing user");
            (StatusCode::UNAUTHORIZED, "User not found".to_string())
        })?;

    Ok(Json(MeResponse {
        email: user.email,
        streak: user.streak,
        last_streak: user.last_streak,
        full_name: user.full_name,
        lang: user.lang,
    }))
}

#[instrument(skip(state, payload))]
pub async fn update_language(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<UpdateLanguageRequest>,
) -> Result<Json<LanguageResponse>, (StatusCode, String)> {
    let lang = payload.lang.parse::<Lang>().map_err(|e| {
        warn!(lang = %payload.lang, user_id = %user_id, "unsupported language code");
        (StatusCode::BAD_REQUEST, e.to_string())
    })?;

    let lang = User::set_lang(&state.db, user_id, lang.as_str())
        .await
        .map_err(internal)?
        .ok_or((StatusCode::UNAUTHORIZED, "User not found".to_string()))?;

    info!(user_id = %user_id, %lang, "language updated");
    Ok(Json(LanguageResponse { lang }))
}

/// Daily check-in. The read-modify-write runs in one transaction with the
/// user's row locked, so two concurrent check-ins cannot both take the
/// increment branch; the loser re-reads the committed state and no-ops.
#[instrument(skip(state))]
pub async fn streak(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<StreakResponse>, (StatusCode, String)> {
    let now = OffsetDateTime::now_utc();

    let mut tx = state.db.begin().await.map_err(|e| internal(e.into()))?;

    let previous = User::streak_for_update(&mut tx, user_id)
        .await
        .map_err(internal)?
        .ok_or((StatusCode::UNAUTHORIZED, "User not found".to_string()))?;

    let (next, updated_today) = update_streak(&previous, now);
    if next != previous {
        User::save_streak(&mut tx, user_id, &next)
            .await
            .map_err(internal)?;
        info!(user_id = %user_id, streak = next.streak, "streak advanced");
    }

    tx.commit().await.map_err(|e| internal(e.into()))?;

    Ok(Json(StreakResponse {
        streak: next.streak,
        last_streak: next.last_streak,
        updated_today,
    }))
}

fn internal(e: anyhow::Error) -> (StatusCode, String) {
    error!(error = %e, "request failed");
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}
