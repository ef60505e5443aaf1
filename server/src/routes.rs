use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header::AUTHORIZATION, HeaderMap},
    Json,
};
use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::info;

use menu_ingest::config::DiningHallSource;
use menu_ingest::db::dining_hall_repo;
use menu_ingest::db::meal_schedule_repo::{self, MealScheduleRow};
use menu_ingest::db::menu_item_repo::{self, MenuItemRow};
use menu_ingest::model::MealPeriod;
use menu_ingest::{IngestionSummary, SourceFailure};

use super::{error::AppError, state::AppState};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeResponse {
    pub success: bool,
    pub dining_halls: usize,
    pub menu_items_saved: usize,
    pub meal_schedules_saved: usize,
    pub failed_sources: Vec<SourceFailure>,
    pub timestamp: DateTime<Utc>,
}

impl From<IngestionSummary> for ScrapeResponse {
    fn from(summary: IngestionSummary) -> Self {
        Self {
            success: true,
            dining_halls: summary.dining_halls_processed,
            menu_items_saved: summary.menu_items_saved,
            meal_schedules_saved: summary.meal_schedules_saved,
            failed_sources: summary.failed_sources,
            timestamp: summary.timestamp,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct MenuQuery {
    pub meal: Option<String>,
}

pub async fn scrape_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<ScrapeResponse>, AppError> {
    authorize(&headers, state.cron_secret.as_ref())?;

    info!("Scrape triggered");
    let summary = state.ingestor.run().await?;
    Ok(Json(summary.into()))
}

pub async fn dining_halls_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<DiningHallSource>>, AppError> {
    Ok(Json(dining_hall_repo::list(&state.db)?))
}

pub async fn menu_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(query): Query<MenuQuery>,
) -> Result<Json<Vec<MenuItemRow>>, AppError> {
    ensure_known_hall(&state, &id)?;

    let meal = match query.meal.as_deref() {
        Some(meal) => Some(meal.parse::<MealPeriod>().map_err(|e| {
            let expected: Vec<&str> = MealPeriod::ALL.iter().map(MealPeriod::as_str).collect();
            AppError::BadRequest(format!("{}, expected one of: {}", e, expected.join(", ")))
        })?),
        None => None,
    };

    Ok(Json(menu_item_repo::find_by_dining_hall(&state.db, &id, meal)?))
}

pub async fn schedule_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<MealScheduleRow>>, AppError> {
    ensure_known_hall(&state, &id)?;

    Ok(Json(meal_schedule_repo::find_by_dining_hall(&state.db, &id)?))
}

fn ensure_known_hall(state: &AppState, id: &str) -> Result<(), AppError> {
    if dining_hall_repo::exists(&state.db, id)? {
        Ok(())
    } else {
        Err(AppError::UnknownDiningHall(id.to_string()))
    }
}

/// Checks `Authorization: Bearer <secret>` when a secret is configured.
fn authorize(headers: &HeaderMap, secret: Option<&SecretString>) -> Result<(), AppError> {
    let Some(secret) = secret else {
        return Ok(());
    };

    let token = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .ok_or(AppError::Unauthorized)?;

    if constant_time_eq(token.as_bytes(), secret.expose_secret().as_bytes()) {
        Ok(())
    } else {
        Err(AppError::Unauthorized)
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
