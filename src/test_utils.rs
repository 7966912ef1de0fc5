//! Shared test utilities for `hr-records`.
//!
//! This module provides common helpers for setting up stores and building
//! records with sensible defaults.

use crate::{
    core::{
        record_store::RecordStore,
        records::{Employee, EmployeeInput, PayrollInput},
        store::{DatabaseStore, KeyValueStore, MemoryStore},
    },
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::DatabaseConnection;
use std::collections::HashSet;
use tokio::sync::RwLock;
use tracing_subscriber::EnvFilter;

/// Installs a tracing subscriber that writes through the test harness.
/// Safe to call from every test; only the first call takes effect.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("trace")),
        )
        .with_test_writer()
        .try_init();
}

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for database-backed tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Record store over a fresh in-memory key-value store.
pub fn memory_record_store() -> RecordStore<MemoryStore> {
    RecordStore::new(MemoryStore::new())
}

/// Record store over a fresh in-memory `SQLite` database.
pub async fn database_record_store() -> Result<RecordStore<DatabaseStore>> {
    Ok(RecordStore::new(DatabaseStore::new(setup_test_db().await?)))
}

/// Employee input with every field filled in, valid for creation.
///
/// # Defaults
/// * department: "Engineering"
/// * job title: "Engineer"
/// * joined: 2020-01-15
/// * email: derived from the first name
pub fn complete_employee_input(employee_id: &str, full_name: &str) -> EmployeeInput {
    let first_name = full_name
        .split_whitespace()
        .next()
        .unwrap_or("someone")
        .to_lowercase();
    EmployeeInput {
        employee_id: Some(employee_id.to_string()),
        full_name: Some(full_name.to_string()),
        department: Some("Engineering".to_string()),
        job_title: Some("Engineer".to_string()),
        date_of_joining: NaiveDate::from_ymd_opt(2020, 1, 15),
        email: Some(format!("{first_name}@example.com")),
        phone_number: Some("555-010-2030".to_string()),
        status: None,
    }
}

/// A stored-shape employee built without going through a store.
pub fn sample_employee(employee_id: &str, full_name: &str) -> Employee {
    Employee::from_input(
        format!("internal_{employee_id}"),
        complete_employee_input(employee_id, full_name),
    )
}

/// Payroll input that computes to gross 7650.00 and net 6865.00.
pub fn sample_payroll_input(employee_id: &str) -> PayrollInput {
    PayrollInput {
        disbursement_date: NaiveDate::from_ymd_opt(2024, 1, 31),
        basic_salary: Some(5000.0.into()),
        house_rent_allowance_percentage: Some(40.0.into()),
        medical_allowance_percentage: Some(10.0.into()),
        conveyance_allowance_fixed: Some(100.0.into()),
        telephone_allowance_fixed: Some(50.0.into()),
        special_allowance_fixed: Some(0.0.into()),
        other_allowances_fixed: Some(0.0.into()),
        income_tax_percentage: Some(10.0.into()),
        other_deductions_fixed: Some(20.0.into()),
        ..PayrollInput::new(employee_id)
    }
}

/// Memory store whose saves can be made to fail per key.
#[derive(Debug, Default)]
pub struct FailingStore {
    inner: MemoryStore,
    failing_keys: RwLock<HashSet<String>>,
}

impl FailingStore {
    /// Every later save under `key` fails with `Error::Store`.
    pub async fn fail_saves_to(&self, key: &str) {
        self.failing_keys.write().await.insert(key.to_string());
    }
}

impl KeyValueStore for FailingStore {
    async fn load(&self, key: &str) -> Result<Option<String>> {
        self.inner.load(key).await
    }

    async fn save(&self, key: &str, json: String) -> Result<()> {
        if self.failing_keys.read().await.contains(key) {
            return Err(Error::Store {
                message: format!("quota exceeded writing '{key}'"),
            });
        }
        self.inner.save(key, json).await
    }
}
