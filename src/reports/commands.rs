use tauri::State;

use crate::{
    reports::summary::{CustomerTimingSummary, TimingsOverview},
    AppState,
};

#[tauri::command]
pub async fn load_customer_timings(
    state: State<'_, AppState>,
) -> Result<Vec<CustomerTimingSummary>, String> {
    state.reports.refresh().await.map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn search_customer_timings(
    state: State<'_, AppState>,
    term: String,
) -> Result<Vec<CustomerTimingSummary>, String> {
    Ok(state.reports.search(&term).await)
}

#[tauri::command]
pub async fn get_timings_overview(state: State<'_, AppState>) -> Result<TimingsOverview, String> {
    Ok(state.reports.overview().await)
}
