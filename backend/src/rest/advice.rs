use axum::extract::State;
use axum::Json;
use shared::{parse_record_date, AdviceResponse, WeatherSnapshot};
use tracing::info;

use super::{today, AppState};
use crate::domain::advice::derive_advice;
use crate::error::AppResult;

/// Advice is derived against the snapshot's own date when one is supplied,
/// so forecasts for tomorrow judge task overdueness as of tomorrow
pub async fn weather_advice(
    State(state): State<AppState>,
    Json(snapshot): Json<WeatherSnapshot>,
) -> AppResult<Json<AdviceResponse>> {
    info!(
        "POST /api/advice - {:.1}°C, {:.0}% humidity, {:.1}mm",
        snapshot.temperature_c, snapshot.humidity_percent, snapshot.precipitation_mm
    );

    let (crops, tasks) = tokio::try_join!(
        state.crop_service.list_crops(),
        state.task_service.list_tasks()
    )?;

    let as_of = snapshot
        .date
        .as_deref()
        .and_then(parse_record_date)
        .unwrap_or_else(today);

    Ok(Json(AdviceResponse {
        advice: derive_advice(&snapshot, &crops, &tasks, as_of),
    }))
}
