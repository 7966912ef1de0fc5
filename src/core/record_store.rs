//! Record store - CRUD over the employee and payroll collections.
//!
//! Each collection is one JSON array in the key-value store. Every mutation
//! is a read-modify-write of the whole array: validation runs before the
//! write, and the write replaces the array in one `save`, so a failed
//! operation leaves the stored collection untouched.
//!
//! Employees are keyed by surrogate id; payrolls are keyed by employee id
//! with at most one payroll per employee.

use crate::{
    config::StorageKeys,
    core::{
        columns,
        ids::{self, new_surrogate_id},
        payroll::compute_metrics,
        records::{Employee, EmployeeInput, Payroll, PayrollInput},
        schema::{self, RecordKind},
        store::KeyValueStore,
        validation::{ValidationMode, validate_record},
    },
    errors::{Error, Result},
};
use serde::{Serialize, de::DeserializeOwned};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

/// Record store over a key-value collaborator.
///
/// Read-modify-write sequences are serialized per collection, so concurrent
/// callers sharing one `RecordStore` never interleave writes to the same
/// collection. Separate `RecordStore` values over the same backing store are
/// not coordinated.
#[derive(Debug)]
pub struct RecordStore<S> {
    store: S,
    keys: StorageKeys,
    employees_lock: Mutex<()>,
    payrolls_lock: Mutex<()>,
}

impl<S: KeyValueStore> RecordStore<S> {
    /// Record store using the default storage keys.
    pub fn new(store: S) -> Self {
        Self::with_keys(store, StorageKeys::default())
    }

    pub fn with_keys(store: S, keys: StorageKeys) -> Self {
        Self {
            store,
            keys,
            employees_lock: Mutex::new(()),
            payrolls_lock: Mutex::new(()),
        }
    }

    /// The underlying key-value store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    async fn load_collection<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>> {
        match self.store.load(key).await? {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(Vec::new()),
        }
    }

    async fn save_collection<T: Serialize>(&self, key: &str, records: &[T]) -> Result<()> {
        let json = serde_json::to_string(records)?;
        self.store.save(key, json).await
    }

    // --- Employees ---

    /// All stored employees; empty when nothing has been stored yet.
    #[instrument(skip(self))]
    pub async fn list_employees(&self) -> Result<Vec<Employee>> {
        let employees: Vec<Employee> = self.load_collection(&self.keys.employees).await?;
        debug!("Fetched {} employees.", employees.len());
        Ok(employees)
    }

    /// Finds an employee by surrogate id.
    pub async fn get_employee(&self, internal_id: &str) -> Result<Option<Employee>> {
        Ok(self
            .list_employees()
            .await?
            .into_iter()
            .find(|e| e.internal_id == internal_id))
    }

    /// The id [`Self::hire_employee`] would assign next.
    pub async fn next_employee_id(&self) -> Result<String> {
        ids::next_employee_id(&self.list_employees().await?)
    }

    /// Adds an employee whose employee id is supplied by the caller.
    ///
    /// Every non-system field must be filled in. The employee id must have
    /// the form `E<digits>` and sort after every existing id.
    ///
    /// # Errors
    /// `Error::Validation` for an empty field, a bad format, or an employee id
    /// that is missing, malformed or not the newest.
    #[instrument(skip(self, data))]
    pub async fn add_employee(&self, data: EmployeeInput) -> Result<Employee> {
        let _guard = self.employees_lock.lock().await;
        let employees = self.list_employees().await?;
        self.insert_employee(employees, data).await
    }

    /// Adds an employee under the next sequential employee id.
    #[instrument(skip(self, data))]
    pub async fn hire_employee(&self, mut data: EmployeeInput) -> Result<Employee> {
        let _guard = self.employees_lock.lock().await;
        let employees = self.list_employees().await?;
        data.employee_id = Some(ids::next_employee_id(&employees)?);
        self.insert_employee(employees, data).await
    }

    async fn insert_employee(
        &self,
        mut employees: Vec<Employee>,
        data: EmployeeInput,
    ) -> Result<Employee> {
        let employee = Employee::from_input(new_surrogate_id(), data);
        validate_record(&employee, ValidationMode::Creation)?;
        check_new_employee_id(&employee.employee_id, &employees)?;

        employees.push(employee.clone());
        self.save_collection(&self.keys.employees, &employees).await?;
        info!(
            "Added employee {} ({})",
            employee.employee_id, employee.internal_id
        );
        Ok(employee)
    }

    /// Merges `data` over the employee with surrogate id `internal_id`.
    /// The surrogate id and employee id never change.
    ///
    /// # Errors
    /// `Error::NotFound` if no such employee exists, `Error::Validation` if
    /// the merged record fails validation.
    #[instrument(skip(self, data))]
    pub async fn update_employee(&self, internal_id: &str, data: EmployeeInput) -> Result<Employee> {
        let _guard = self.employees_lock.lock().await;
        let mut employees = self.list_employees().await?;

        let slot = employees
            .iter_mut()
            .find(|e| e.internal_id == internal_id)
            .ok_or_else(|| Error::NotFound {
                entity: RecordKind::Employee.entity_name(),
                key: internal_id.to_string(),
            })?;

        if data
            .employee_id
            .as_deref()
            .is_some_and(|id| id != slot.employee_id)
        {
            debug!("Ignoring employee id change for {}", slot.employee_id);
        }

        let updated = slot.merged(data);
        validate_record(&updated, ValidationMode::Standard)?;
        *slot = updated.clone();

        self.save_collection(&self.keys.employees, &employees).await?;
        info!("Updated employee {}", updated.employee_id);
        Ok(updated)
    }

    /// Deletes a terminated employee and its payroll record.
    ///
    /// # Errors
    /// `Error::NotFound` if no such employee exists, `Error::Precondition` if
    /// the employee is still Active or On Leave.
    #[instrument(skip(self))]
    pub async fn delete_employee(&self, internal_id: &str) -> Result<()> {
        let _guard = self.employees_lock.lock().await;
        let mut employees = self.list_employees().await?;

        let position = employees
            .iter()
            .position(|e| e.internal_id == internal_id)
            .ok_or_else(|| Error::NotFound {
                entity: RecordKind::Employee.entity_name(),
                key: internal_id.to_string(),
            })?;

        let employee = &employees[position];
        if !employee.status.allows_deletion() {
            warn!(
                "Refusing to delete employee {} with status {}",
                employee.employee_id, employee.status
            );
            return Err(Error::Precondition {
                message: format!(
                    "Cannot delete employee {} ({}). They are currently {}. \
                     Change their status to 'Terminated' first.",
                    employee.full_name, employee.employee_id, employee.status
                ),
            });
        }

        let removed = employees.remove(position);

        let _payrolls_guard = self.payrolls_lock.lock().await;
        let payrolls = self.list_payrolls().await?;
        let remaining: Vec<&Payroll> = payrolls
            .iter()
            .filter(|p| p.record.employee_id != removed.employee_id)
            .collect();
        let payroll_removed = remaining.len() != payrolls.len();

        // Payroll goes first; it is put back if the employee write fails.
        if payroll_removed {
            self.save_collection(&self.keys.payrolls, &remaining).await?;
        }
        if let Err(error) = self.save_collection(&self.keys.employees, &employees).await {
            if payroll_removed {
                warn!(
                    "Restoring payroll for {} after failed delete",
                    removed.employee_id
                );
                self.save_collection(&self.keys.payrolls, &payrolls).await?;
            }
            return Err(error);
        }

        info!("Deleted employee {}", removed.employee_id);
        Ok(())
    }

    // --- Payrolls ---

    /// All stored payrolls; empty when nothing has been stored yet.
    #[instrument(skip(self))]
    pub async fn list_payrolls(&self) -> Result<Vec<Payroll>> {
        let payrolls: Vec<Payroll> = self.load_collection(&self.keys.payrolls).await?;
        debug!("Fetched {} payrolls.", payrolls.len());
        Ok(payrolls)
    }

    /// The payroll of the employee with business key `employee_id`, if any.
    pub async fn get_payroll_by_employee_id(&self, employee_id: &str) -> Result<Option<Payroll>> {
        Ok(self
            .list_payrolls()
            .await?
            .into_iter()
            .find(|p| p.record.employee_id == employee_id))
    }

    /// Creates or updates the payroll for `data.employee_id`.
    ///
    /// An existing payroll has `data` merged over it; a disbursement date that
    /// was already set is kept regardless of what was submitted. A new payroll
    /// starts from the schema defaults. Calculated figures are always derived
    /// from the merged inputs.
    ///
    /// # Errors
    /// `Error::Validation` if the employee id is empty or the merged form
    /// state fails validation.
    #[instrument(skip(self, data), fields(employee_id = %data.employee_id))]
    pub async fn upsert_payroll(&self, data: PayrollInput) -> Result<Payroll> {
        if data.employee_id.trim().is_empty() {
            return Err(Error::validation(schema::EMPLOYEE_ID, "Employee ID is required."));
        }

        let _guard = self.payrolls_lock.lock().await;
        let mut payrolls = self.list_payrolls().await?;
        let existing = payrolls
            .iter()
            .position(|p| p.record.employee_id == data.employee_id);

        let saved = if let Some(index) = existing {
            let original = &payrolls[index];
            let frozen_date = original
                .record
                .disbursement_date
                .filter(|_| disbursement_date_is_frozen());

            let mut merged = PayrollInput::from(&original.record).merged(data);
            if let Some(date) = frozen_date {
                if merged.disbursement_date != Some(date) {
                    debug!("Keeping original disbursement date {}", date);
                }
                merged.disbursement_date = Some(date);
            }
            validate_record(&merged, ValidationMode::Standard)?;

            let payroll = Payroll {
                internal_id: original.internal_id.clone(),
                record: compute_metrics(&merged),
            };
            payrolls[index] = payroll.clone();
            payroll
        } else {
            let merged = PayrollInput::with_defaults(data.employee_id.clone()).merged(data);
            validate_record(&merged, ValidationMode::Standard)?;

            let payroll = Payroll {
                internal_id: new_surrogate_id(),
                record: compute_metrics(&merged),
            };
            payrolls.push(payroll.clone());
            payroll
        };

        self.save_collection(&self.keys.payrolls, &payrolls).await?;
        info!(
            "Saved payroll for {} (net {:.2})",
            saved.record.employee_id, saved.record.net_salary
        );
        Ok(saved)
    }

    /// Removes the payroll of `employee_id`. Does nothing if there is none.
    #[instrument(skip(self))]
    pub async fn delete_payroll_by_employee_id(&self, employee_id: &str) -> Result<()> {
        let _guard = self.payrolls_lock.lock().await;
        let mut payrolls = self.list_payrolls().await?;
        let before = payrolls.len();
        payrolls.retain(|p| p.record.employee_id != employee_id);

        if payrolls.len() == before {
            debug!("No payroll stored for {}", employee_id);
            return Ok(());
        }

        self.save_collection(&self.keys.payrolls, &payrolls).await?;
        info!("Deleted payroll for {}", employee_id);
        Ok(())
    }

    // --- Column preferences ---

    const fn columns_key(&self, kind: RecordKind) -> &String {
        match kind {
            RecordKind::Employee => &self.keys.employee_columns,
            RecordKind::Payroll => &self.keys.payroll_columns,
        }
    }

    /// Visible column keys for `kind`: the stored preference with the
    /// always-visible policy reapplied, or the defaults if nothing is stored.
    pub async fn load_visible_columns(&self, kind: RecordKind) -> Result<Vec<String>> {
        let stored: Option<Vec<String>> = match self.store.load(self.columns_key(kind)).await? {
            Some(json) => Some(serde_json::from_str(&json)?),
            None => None,
        };
        Ok(stored.map_or_else(
            || columns::default_visible_columns(kind.schema(), kind),
            |keys| columns::normalize_stored_columns(kind, &keys),
        ))
    }

    /// Stores the visible column keys for `kind` after applying the
    /// always-visible policy. Returns what was stored.
    pub async fn save_visible_columns(&self, kind: RecordKind, keys: &[String]) -> Result<Vec<String>> {
        let keys = columns::apply_always_visible(kind.schema(), keys);
        self.save_collection(self.columns_key(kind), &keys).await?;
        Ok(keys)
    }
}

fn disbursement_date_is_frozen() -> bool {
    schema::find_field(schema::payroll_schema(), schema::DISBURSEMENT_DATE)
        .is_some_and(|field| !field.is_editable_after_creation)
}

fn check_new_employee_id(employee_id: &str, existing: &[Employee]) -> Result<()> {
    let sequence = ids::employee_id_sequence(employee_id).ok_or_else(|| {
        let message = if employee_id.trim().is_empty() {
            "Employee ID cannot be empty.".to_string()
        } else {
            format!("Employee ID '{employee_id}' must look like E001.")
        };
        Error::validation(schema::EMPLOYEE_ID, message)
    })?;

    if existing.iter().any(|e| e.employee_id == employee_id) {
        return Err(Error::validation(
            schema::EMPLOYEE_ID,
            format!("Employee ID {employee_id} already exists."),
        ));
    }

    let latest = ids::max_employee_sequence(existing);
    if sequence <= latest {
        return Err(Error::validation(
            schema::EMPLOYEE_ID,
            format!(
                "Employee ID {employee_id} must come after {}.",
                ids::format_employee_id(latest)
            ),
        ));
    }
    Ok(())
}
