use tauri::State;

use crate::{
    db::models::{Customer, CustomerInput},
    AppState,
};

/// Registers the customer currently held in workflow state and stores the
/// new id in the session, tying subsequent step timings to it.
#[tauri::command]
pub async fn register_customer(state: State<'_, AppState>) -> Result<Customer, String> {
    let details = state.workflow.get_state().await.customer;

    if details.full_name.trim().is_empty() || details.contact_number.trim().is_empty() {
        return Err("customer name and contact number are required".into());
    }

    let customer = state
        .db
        .create_customer(CustomerInput {
            name: details.full_name,
            phone: details.contact_number,
            vehicle_number: details.vehicle_number,
            service_type: details.service_type,
            transfer_type: details.transfer_type,
        })
        .await
        .map_err(|e| e.to_string())?;

    state
        .session
        .set_customer_id(Some(customer.id.clone()))
        .map_err(|e| e.to_string())?;

    Ok(customer)
}

#[tauri::command]
pub async fn list_customers(state: State<'_, AppState>) -> Result<Vec<Customer>, String> {
    state.db.list_customers().await.map_err(|e| e.to_string())
}
