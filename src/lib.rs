mod customers;
pub mod db;
pub mod reports;
pub mod session;
pub mod workflow;

use std::sync::Arc;

use customers::commands::{list_customers, register_customer};
use db::Database;
use reports::{
    commands::{get_timings_overview, load_customer_timings, search_customer_timings},
    ReportsController,
};
use session::SessionStore;
use tauri::{Emitter, Manager, State};
use workflow::{
    commands::{
        complete_step, get_workflow_state, reset_workflow, start_step, update_customer_details,
    },
    WorkflowController,
};

pub(crate) struct AppState {
    pub(crate) db: Database,
    pub(crate) session: Arc<SessionStore>,
    pub(crate) workflow: WorkflowController,
    pub(crate) reports: ReportsController,
}

#[derive(serde::Serialize, serde::Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SessionPreferences {
    language: String,
    theme: String,
}

#[tauri::command]
fn get_session_preferences(state: State<AppState>) -> Result<SessionPreferences, String> {
    Ok(SessionPreferences {
        language: state.session.language(),
        theme: state.session.theme(),
    })
}

#[tauri::command]
fn set_language(
    language: String,
    state: State<AppState>,
    app_handle: tauri::AppHandle,
) -> Result<(), String> {
    state
        .session
        .set_language(language.clone())
        .map_err(|e| e.to_string())?;

    app_handle
        .emit("language-changed", &language)
        .map_err(|e| e.to_string())?;

    Ok(())
}

#[tauri::command]
fn toggle_theme(state: State<AppState>) -> Result<String, String> {
    let next = if state.session.theme() == "light" {
        "dark"
    } else {
        "light"
    };

    state
        .session
        .set_theme(next.to_string())
        .map_err(|e| e.to_string())?;

    Ok(next.to_string())
}

#[tauri::command]
fn set_service_id(service_id: Option<String>, state: State<AppState>) -> Result<(), String> {
    state
        .session
        .set_service_id(service_id)
        .map_err(|e| e.to_string())
}

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    // Initialize logging (reads RUST_LOG env var)
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    log::info!("dmtrack starting up...");

    tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .setup(|app| {
            let result = (|| -> anyhow::Result<()> {
                let app_data_dir = app
                    .path()
                    .app_data_dir()
                    .map_err(|err| anyhow::anyhow!(err))?;
                std::fs::create_dir_all(&app_data_dir)?;

                let db_path = app_data_dir.join("dmtrack.sqlite3");
                let database = Database::new(db_path)?;

                let session_path = app_data_dir.join("session.json");
                let session = Arc::new(SessionStore::new(session_path)?);

                let workflow = WorkflowController::new(database.clone(), session.clone());
                let reports = ReportsController::new(database.clone());

                app.manage(AppState {
                    db: database,
                    session,
                    workflow,
                    reports,
                });

                Ok(())
            })();

            result.map_err(|err| err.into())
        })
        .invoke_handler(tauri::generate_handler![
            get_workflow_state,
            start_step,
            complete_step,
            update_customer_details,
            reset_workflow,
            register_customer,
            list_customers,
            load_customer_timings,
            search_customer_timings,
            get_timings_overview,
            get_session_preferences,
            set_language,
            toggle_theme,
            set_service_id,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
