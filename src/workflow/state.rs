use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::db::models::ServiceType;

/// Ordinal-to-name table for the service workflow. Steps past the end of
/// the table fall back to a numeric label.
const STEP_NAMES: [&str; 5] = [
    "Documents",
    "Verification",
    "Payment",
    "Processing",
    "Completed",
];

pub fn step_name(step_id: u32) -> String {
    match step_id {
        1..=5 => STEP_NAMES[(step_id - 1) as usize].to_string(),
        _ => format!("Step {step_id}"),
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDetails {
    pub vehicle_number: String,
    pub full_name: String,
    pub contact_number: String,
    pub service_type: ServiceType,
    pub transfer_type: String,
}

/// Partial update for [`CustomerDetails`]; absent fields are left as-is.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDetailsPatch {
    pub vehicle_number: Option<String>,
    pub full_name: Option<String>,
    pub contact_number: Option<String>,
    pub service_type: Option<ServiceType>,
    pub transfer_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StepTiming {
    pub step_id: u32,
    pub start_time: DateTime<Utc>,
    /// Transitions once from `None` to `Some`; never reopened.
    pub end_time: Option<DateTime<Utc>>,
}

/// Result of completing a step, carrying everything the persistence
/// layer needs for the durable record.
#[derive(Debug, Clone)]
pub struct CompletedStep {
    pub step_id: u32,
    pub step_name: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowState {
    pub current_step: u32,
    pub timings: Vec<StepTiming>,
    pub customer: CustomerDetails,
}

impl Default for WorkflowState {
    fn default() -> Self {
        Self {
            current_step: 1,
            timings: Vec::new(),
            customer: CustomerDetails::default(),
        }
    }
}

impl WorkflowState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a timing entry for `step_id`. Idempotent: a second call for
    /// the same step keeps the original entry and start time.
    pub fn start_step(&mut self, step_id: u32, now: DateTime<Utc>) {
        if self.timings.iter().any(|t| t.step_id == step_id) {
            return;
        }
        self.timings.push(StepTiming {
            step_id,
            start_time: now,
            end_time: None,
        });
    }

    /// Closes the timing entry for `step_id`, advances the current-step
    /// pointer, and opens the next step. There is no upper bound on the
    /// pointer: completing the terminal step still rolls over and opens
    /// an entry for the step after it.
    pub fn complete_step(&mut self, step_id: u32, now: DateTime<Utc>) -> Result<CompletedStep> {
        let entry = match self.timings.iter_mut().find(|t| t.step_id == step_id) {
            Some(entry) => entry,
            None => bail!("step {step_id} was never started"),
        };
        if entry.end_time.is_some() {
            bail!("step {step_id} is already completed");
        }

        entry.end_time = Some(now);
        let start_time = entry.start_time;
        let duration_seconds = (now - start_time).num_seconds().max(0) as u64;

        self.current_step = step_id + 1;
        self.start_step(step_id + 1, now);

        Ok(CompletedStep {
            step_id,
            step_name: step_name(step_id),
            start_time,
            end_time: now,
            duration_seconds,
        })
    }

    pub fn update_customer(&mut self, patch: CustomerDetailsPatch) {
        if let Some(vehicle_number) = patch.vehicle_number {
            self.customer.vehicle_number = vehicle_number;
        }
        if let Some(full_name) = patch.full_name {
            self.customer.full_name = full_name;
        }
        if let Some(contact_number) = patch.contact_number {
            self.customer.contact_number = contact_number;
        }
        if let Some(service_type) = patch.service_type {
            self.customer.service_type = service_type;
        }
        if let Some(transfer_type) = patch.transfer_type {
            self.customer.transfer_type = transfer_type;
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn at_millis(millis: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(millis).unwrap()
    }

    #[test]
    fn start_step_is_idempotent() {
        let mut state = WorkflowState::new();
        state.start_step(1, at(10));
        state.start_step(1, at(99));

        assert_eq!(state.timings.len(), 1);
        assert_eq!(state.timings[0].start_time, at(10));
        assert_eq!(state.timings[0].end_time, None);
    }

    #[test]
    fn complete_step_computes_floored_duration() {
        let mut state = WorkflowState::new();
        state.start_step(1, at_millis(0));

        let completed = state.complete_step(1, at_millis(125_900)).unwrap();
        assert_eq!(completed.duration_seconds, 125);
        assert_eq!(completed.step_name, "Documents");
    }

    #[test]
    fn sub_second_duration_is_zero() {
        let mut state = WorkflowState::new();
        state.start_step(1, at_millis(0));

        let completed = state.complete_step(1, at_millis(999)).unwrap();
        assert_eq!(completed.duration_seconds, 0);
    }

    #[test]
    fn duration_never_negative() {
        let mut state = WorkflowState::new();
        state.start_step(1, at(100));

        let completed = state.complete_step(1, at(40)).unwrap();
        assert_eq!(completed.duration_seconds, 0);
    }

    #[test]
    fn complete_step_advances_and_opens_next() {
        let mut state = WorkflowState::new();
        state.start_step(1, at_millis(0));

        state.complete_step(1, at_millis(125_000)).unwrap();

        assert_eq!(state.current_step, 2);
        let next = state.timings.iter().find(|t| t.step_id == 2).unwrap();
        assert_eq!(next.start_time, at_millis(125_000));
        assert_eq!(next.end_time, None);
    }

    #[test]
    fn completing_terminal_step_rolls_over() {
        let mut state = WorkflowState::new();
        state.start_step(5, at(0));

        let completed = state.complete_step(5, at(30)).unwrap();
        assert_eq!(completed.step_name, "Completed");
        assert_eq!(state.current_step, 6);
        assert!(state.timings.iter().any(|t| t.step_id == 6));
    }

    #[test]
    fn out_of_range_step_gets_numeric_name() {
        assert_eq!(step_name(6), "Step 6");
        assert_eq!(step_name(1), "Documents");
        assert_eq!(step_name(5), "Completed");
    }

    #[test]
    fn second_completion_is_rejected() {
        let mut state = WorkflowState::new();
        state.start_step(1, at(0));
        state.complete_step(1, at(5)).unwrap();

        let err = state.complete_step(1, at(9)).unwrap_err();
        assert!(err.to_string().contains("already completed"));

        let entry = state.timings.iter().find(|t| t.step_id == 1).unwrap();
        assert_eq!(entry.end_time, Some(at(5)));
    }

    #[test]
    fn completing_unstarted_step_fails() {
        let mut state = WorkflowState::new();
        let err = state.complete_step(3, at(0)).unwrap_err();
        assert!(err.to_string().contains("never started"));
    }

    #[test]
    fn customer_patch_merges_partially() {
        let mut state = WorkflowState::new();
        state.update_customer(CustomerDetailsPatch {
            full_name: Some("Alice Perera".into()),
            contact_number: Some("0771234567".into()),
            ..Default::default()
        });
        state.update_customer(CustomerDetailsPatch {
            service_type: Some(ServiceType::OneDay),
            ..Default::default()
        });

        assert_eq!(state.customer.full_name, "Alice Perera");
        assert_eq!(state.customer.contact_number, "0771234567");
        assert_eq!(state.customer.service_type, ServiceType::OneDay);
        assert_eq!(state.customer.vehicle_number, "");
    }

    #[test]
    fn reset_returns_to_initial_state() {
        let mut state = WorkflowState::new();
        state.start_step(1, at(0));
        state.complete_step(1, at(60)).unwrap();
        state.update_customer(CustomerDetailsPatch {
            full_name: Some("Alice".into()),
            ..Default::default()
        });

        state.reset();

        assert_eq!(state.current_step, 1);
        assert!(state.timings.is_empty());
        assert_eq!(state.customer, CustomerDetails::default());
    }
}
