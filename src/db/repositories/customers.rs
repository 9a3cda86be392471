use anyhow::Result;
use chrono::Utc;
use rusqlite::{params, Row};
use uuid::Uuid;

use crate::db::{
    connection::Database,
    helpers::{parse_datetime, parse_service_type},
    models::{Customer, CustomerInput},
};

fn row_to_customer(row: &Row) -> Result<Customer> {
    let created_at: String = row.get("created_at")?;
    let service_type: String = row.get("service_type")?;

    Ok(Customer {
        id: row.get("id")?,
        name: row.get("name")?,
        phone: row.get("phone")?,
        vehicle_number: row.get("vehicle_number")?,
        service_type: parse_service_type(&service_type)?,
        transfer_type: row.get("transfer_type")?,
        created_at: parse_datetime(&created_at, "created_at")?,
    })
}

impl Database {
    pub async fn create_customer(&self, input: CustomerInput) -> Result<Customer> {
        self.execute(move |conn| {
            let customer = Customer {
                id: Uuid::new_v4().to_string(),
                name: input.name,
                phone: input.phone,
                vehicle_number: input.vehicle_number,
                service_type: input.service_type,
                transfer_type: input.transfer_type,
                created_at: Utc::now(),
            };

            conn.execute(
                "INSERT INTO customers (id, name, phone, vehicle_number, service_type, transfer_type, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    customer.id,
                    customer.name,
                    customer.phone,
                    customer.vehicle_number,
                    customer.service_type.as_str(),
                    customer.transfer_type,
                    customer.created_at.to_rfc3339(),
                ],
            )?;

            Ok(customer)
        })
        .await
    }

    pub async fn list_customers(&self) -> Result<Vec<Customer>> {
        self.execute(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, name, phone, vehicle_number, service_type, transfer_type, created_at
                 FROM customers
                 ORDER BY created_at DESC",
            )?;

            let mut rows = stmt.query([])?;
            let mut customers = Vec::new();
            while let Some(row) = rows.next()? {
                customers.push(row_to_customer(row)?);
            }

            Ok(customers)
        })
        .await
    }
}
