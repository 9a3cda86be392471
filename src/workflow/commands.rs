use tauri::{AppHandle, Emitter, State};

use crate::{
    workflow::{state::CustomerDetailsPatch, WorkflowState},
    AppState,
};

fn emit_workflow_state(app_handle: &AppHandle, state: &WorkflowState) {
    let _ = app_handle.emit("workflow-state-changed", state);
}

#[tauri::command]
pub async fn get_workflow_state(state: State<'_, AppState>) -> Result<WorkflowState, String> {
    Ok(state.workflow.get_state().await)
}

#[tauri::command]
pub async fn start_step(
    state: State<'_, AppState>,
    app_handle: AppHandle,
    step_id: u32,
) -> Result<WorkflowState, String> {
    let snapshot = state.workflow.start_step(step_id).await;
    emit_workflow_state(&app_handle, &snapshot);
    Ok(snapshot)
}

#[tauri::command]
pub async fn complete_step(
    state: State<'_, AppState>,
    app_handle: AppHandle,
    step_id: u32,
) -> Result<WorkflowState, String> {
    let snapshot = state
        .workflow
        .complete_step(step_id)
        .await
        .map_err(|e| e.to_string())?;
    emit_workflow_state(&app_handle, &snapshot);
    Ok(snapshot)
}

#[tauri::command]
pub async fn update_customer_details(
    state: State<'_, AppState>,
    patch: CustomerDetailsPatch,
) -> Result<WorkflowState, String> {
    Ok(state.workflow.update_customer_details(patch).await)
}

#[tauri::command]
pub async fn reset_workflow(
    state: State<'_, AppState>,
    app_handle: AppHandle,
) -> Result<WorkflowState, String> {
    let snapshot = state.workflow.reset().await.map_err(|e| e.to_string())?;
    emit_workflow_state(&app_handle, &snapshot);
    Ok(snapshot)
}
