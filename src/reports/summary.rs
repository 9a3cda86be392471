//! Per-customer timing aggregation for the admin view.
//!
//! Everything here is a pure function over rows already fetched from the
//! store; the fetch pipeline lives in the controller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::db::models::{Customer, StepTimingRecord};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CustomerTimingSummary {
    pub customer_id: String,
    pub customer_name: String,
    pub customer_phone: String,
    pub total_seconds: u64,
    pub step_count: usize,
    pub last_activity: DateTime<Utc>,
}

/// Aggregates for the stat cards above the timings table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TimingsOverview {
    pub customers_tracked: usize,
    pub average_seconds: u64,
    pub average_formatted: String,
    pub total_steps: usize,
}

/// Collapses one customer's records into a summary row. Customers with no
/// records contribute no row at all rather than a zero row.
pub fn summarize_customer(
    customer: &Customer,
    timings: &[StepTimingRecord],
) -> Option<CustomerTimingSummary> {
    if timings.is_empty() {
        return None;
    }

    let total_seconds = timings.iter().map(|t| t.duration_seconds).sum();

    let mut by_recency: Vec<&StepTimingRecord> = timings.iter().collect();
    by_recency.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    let last_activity = by_recency[0].created_at;

    Some(CustomerTimingSummary {
        customer_id: customer.id.clone(),
        customer_name: customer.name.clone(),
        customer_phone: customer.phone.clone(),
        total_seconds,
        step_count: timings.len(),
        last_activity,
    })
}

/// Descending by total time; stable, so ties keep their incoming order.
pub fn sort_summaries(summaries: &mut [CustomerTimingSummary]) {
    summaries.sort_by(|a, b| b.total_seconds.cmp(&a.total_seconds));
}

/// Case-insensitive substring match on the name, literal substring match
/// on the phone. A blank term returns the list unchanged.
pub fn filter_summaries(
    summaries: &[CustomerTimingSummary],
    term: &str,
) -> Vec<CustomerTimingSummary> {
    if term.trim().is_empty() {
        return summaries.to_vec();
    }

    let needle = term.to_lowercase();
    summaries
        .iter()
        .filter(|s| {
            s.customer_name.to_lowercase().contains(&needle) || s.customer_phone.contains(term)
        })
        .cloned()
        .collect()
}

pub fn format_duration(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    format!("{hours}h {minutes}m {secs}s")
}

pub fn overview(summaries: &[CustomerTimingSummary]) -> TimingsOverview {
    let customers_tracked = summaries.len();
    let total_steps = summaries.iter().map(|s| s.step_count).sum();
    let average_seconds = if customers_tracked > 0 {
        summaries.iter().map(|s| s.total_seconds).sum::<u64>() / customers_tracked as u64
    } else {
        0
    };

    TimingsOverview {
        customers_tracked,
        average_seconds,
        average_formatted: format_duration(average_seconds),
        total_steps,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::ServiceType;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn customer(id: &str, name: &str, phone: &str) -> Customer {
        Customer {
            id: id.into(),
            name: name.into(),
            phone: phone.into(),
            vehicle_number: "CAB-1234".into(),
            service_type: ServiceType::Normal,
            transfer_type: "ownership".into(),
            created_at: at(0),
        }
    }

    fn record(customer_id: &str, step_id: u32, duration_seconds: u64, created_secs: i64) -> StepTimingRecord {
        StepTimingRecord {
            id: format!("{customer_id}-{step_id}"),
            customer_id: customer_id.into(),
            service_id: None,
            step_id,
            step_name: crate::workflow::state::step_name(step_id),
            start_time: at(created_secs - duration_seconds as i64),
            end_time: at(created_secs),
            duration_seconds,
            created_at: at(created_secs),
        }
    }

    fn summary(id: &str, name: &str, phone: &str, total_seconds: u64) -> CustomerTimingSummary {
        CustomerTimingSummary {
            customer_id: id.into(),
            customer_name: name.into(),
            customer_phone: phone.into(),
            total_seconds,
            step_count: 1,
            last_activity: at(0),
        }
    }

    #[test]
    fn customer_without_records_is_skipped() {
        let c = customer("c1", "Alice", "0771111111");
        assert!(summarize_customer(&c, &[]).is_none());
    }

    #[test]
    fn totals_steps_and_recency() {
        let c = customer("c1", "Alice", "0771111111");
        let rows = vec![
            record("c1", 1, 120, 100),
            record("c1", 2, 30, 400),
            record("c1", 3, 50, 250),
        ];

        let summary = summarize_customer(&c, &rows).unwrap();
        assert_eq!(summary.total_seconds, 200);
        assert_eq!(summary.step_count, 3);
        assert_eq!(summary.last_activity, at(400));
    }

    #[test]
    fn sorts_descending_by_total() {
        let mut rows = vec![
            summary("a", "A", "1", 5),
            summary("b", "B", "2", 50),
            summary("c", "C", "3", 10),
        ];
        sort_summaries(&mut rows);

        let totals: Vec<u64> = rows.iter().map(|s| s.total_seconds).collect();
        assert_eq!(totals, vec![50, 10, 5]);
    }

    #[test]
    fn tied_totals_keep_independent_step_counts() {
        let a = customer("a", "A", "1");
        let b = customer("b", "B", "2");

        let a_rows = vec![record("a", 1, 150, 10), record("a", 2, 150, 20)];
        let b_rows = vec![
            record("b", 1, 60, 10),
            record("b", 2, 60, 20),
            record("b", 3, 60, 30),
            record("b", 4, 60, 40),
            record("b", 5, 60, 50),
        ];

        let sa = summarize_customer(&a, &a_rows).unwrap();
        let sb = summarize_customer(&b, &b_rows).unwrap();

        assert_eq!(sa.total_seconds, 300);
        assert_eq!(sb.total_seconds, 300);
        assert_eq!(sa.step_count, 2);
        assert_eq!(sb.step_count, 5);
    }

    #[test]
    fn filter_blank_term_is_identity() {
        let rows = vec![summary("a", "Alice", "077", 5), summary("b", "Bob", "078", 3)];
        assert_eq!(filter_summaries(&rows, ""), rows);
        assert_eq!(filter_summaries(&rows, "   "), rows);
    }

    #[test]
    fn filter_matches_name_case_insensitively() {
        let rows = vec![
            summary("a", "Alice", "0771111111", 5),
            summary("b", "Bob", "0782222222", 3),
        ];

        let hits = filter_summaries(&rows, "ali");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].customer_name, "Alice");
    }

    #[test]
    fn filter_matches_phone_literally() {
        let rows = vec![
            summary("a", "Alice", "0771111111", 5),
            summary("b", "Bob", "0782222222", 3),
        ];

        let hits = filter_summaries(&rows, "0782");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].customer_id, "b");
    }

    #[test]
    fn formats_duration_components() {
        assert_eq!(format_duration(0), "0h 0m 0s");
        assert_eq!(format_duration(3661), "1h 1m 1s");
        assert_eq!(format_duration(7322), "2h 2m 2s");
        assert_eq!(format_duration(59), "0h 0m 59s");
    }

    #[test]
    fn overview_floors_the_average() {
        let rows = vec![
            summary("a", "A", "1", 10),
            summary("b", "B", "2", 11),
            summary("c", "C", "3", 11),
        ];

        let stats = overview(&rows);
        assert_eq!(stats.customers_tracked, 3);
        assert_eq!(stats.average_seconds, 10);
        assert_eq!(stats.total_steps, 3);
        assert_eq!(stats.average_formatted, "0h 0m 10s");
    }

    #[test]
    fn overview_of_empty_list() {
        let stats = overview(&[]);
        assert_eq!(stats.customers_tracked, 0);
        assert_eq!(stats.average_seconds, 0);
        assert_eq!(stats.average_formatted, "0h 0m 0s");
        assert_eq!(stats.total_steps, 0);
    }
}
