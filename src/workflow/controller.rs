use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use log::{error, info};
use tokio::sync::Mutex;

use crate::{
    db::{models::NewStepTiming, Database},
    session::SessionStore,
};

use super::state::{CustomerDetailsPatch, WorkflowState};

/// Drives the live customer workflow: one step active at a time,
/// sequential progression, one durable timing record per completed step.
#[derive(Clone)]
pub struct WorkflowController {
    state: Arc<Mutex<WorkflowState>>,
    db: Database,
    session: Arc<SessionStore>,
}

impl WorkflowController {
    pub fn new(db: Database, session: Arc<SessionStore>) -> Self {
        Self {
            state: Arc::new(Mutex::new(WorkflowState::new())),
            db,
            session,
        }
    }

    pub async fn get_state(&self) -> WorkflowState {
        self.state.lock().await.clone()
    }

    pub async fn start_step(&self, step_id: u32) -> WorkflowState {
        let mut state = self.state.lock().await;
        state.start_step(step_id, Utc::now());
        state.clone()
    }

    /// Completes `step_id` and advances to the next step. The durable
    /// write happens after the in-memory transition; a write failure is
    /// logged and swallowed so progression never stalls on the store.
    pub async fn complete_step(&self, step_id: u32) -> Result<WorkflowState> {
        let completed = {
            let mut state = self.state.lock().await;
            state.complete_step(step_id, Utc::now())?
        };

        if let Some(customer_id) = self.session.customer_id() {
            let record = NewStepTiming {
                customer_id,
                service_id: self.session.service_id(),
                step_id: completed.step_id,
                step_name: completed.step_name.clone(),
                start_time: completed.start_time,
                end_time: completed.end_time,
                duration_seconds: completed.duration_seconds,
            };

            match self.db.create_step_timing(record).await {
                Ok(saved) => info!(
                    "Recorded step {} ({}) in {}s for customer {}",
                    saved.step_id, saved.step_name, saved.duration_seconds, saved.customer_id
                ),
                Err(err) => error!("Failed to save timing for step {step_id}: {err}"),
            }
        }

        Ok(self.get_state().await)
    }

    pub async fn update_customer_details(&self, patch: CustomerDetailsPatch) -> WorkflowState {
        let mut state = self.state.lock().await;
        state.update_customer(patch);
        state.clone()
    }

    /// Discards session timing state and the stored customer/service
    /// identity, returning the workflow to step 1.
    pub async fn reset(&self) -> Result<WorkflowState> {
        let mut state = self.state.lock().await;
        state.reset();
        self.session.clear_identity()?;
        Ok(state.clone())
    }
}
