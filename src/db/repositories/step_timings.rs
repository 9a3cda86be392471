use anyhow::Result;
use chrono::Utc;
use rusqlite::{params, Row};
use uuid::Uuid;

use crate::db::{
    connection::Database,
    helpers::{parse_datetime, to_i64, to_u32, to_u64},
    models::{NewStepTiming, StepTimingRecord},
};

fn row_to_step_timing(row: &Row) -> Result<StepTimingRecord> {
    let start_time: String = row.get("start_time")?;
    let end_time: String = row.get("end_time")?;
    let created_at: String = row.get("created_at")?;
    let step_id: i64 = row.get("step_id")?;
    let duration_seconds: i64 = row.get("duration_seconds")?;

    Ok(StepTimingRecord {
        id: row.get("id")?,
        customer_id: row.get("customer_id")?,
        service_id: row.get("service_id")?,
        step_id: to_u32(step_id, "step_id")?,
        step_name: row.get("step_name")?,
        start_time: parse_datetime(&start_time, "start_time")?,
        end_time: parse_datetime(&end_time, "end_time")?,
        duration_seconds: to_u64(duration_seconds, "duration_seconds")?,
        created_at: parse_datetime(&created_at, "created_at")?,
    })
}

impl Database {
    pub async fn create_step_timing(&self, input: NewStepTiming) -> Result<StepTimingRecord> {
        self.execute(move |conn| {
            let record = StepTimingRecord {
                id: Uuid::new_v4().to_string(),
                customer_id: input.customer_id,
                service_id: input.service_id,
                step_id: input.step_id,
                step_name: input.step_name,
                start_time: input.start_time,
                end_time: input.end_time,
                duration_seconds: input.duration_seconds,
                created_at: Utc::now(),
            };

            conn.execute(
                "INSERT INTO step_timings (id, customer_id, service_id, step_id, step_name, start_time, end_time, duration_seconds, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    record.id,
                    record.customer_id,
                    record.service_id,
                    to_i64(u64::from(record.step_id))?,
                    record.step_name,
                    record.start_time.to_rfc3339(),
                    record.end_time.to_rfc3339(),
                    to_i64(record.duration_seconds)?,
                    record.created_at.to_rfc3339(),
                ],
            )?;

            Ok(record)
        })
        .await
    }

    pub async fn get_step_timings_for_customer(
        &self,
        customer_id: &str,
    ) -> Result<Vec<StepTimingRecord>> {
        let customer_id = customer_id.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, customer_id, service_id, step_id, step_name, start_time, end_time, duration_seconds, created_at
                 FROM step_timings
                 WHERE customer_id = ?1
                 ORDER BY created_at ASC",
            )?;

            let mut rows = stmt.query(params![customer_id])?;
            let mut timings = Vec::new();
            while let Some(row) = rows.next()? {
                timings.push(row_to_step_timing(row)?);
            }

            Ok(timings)
        })
        .await
    }
}
