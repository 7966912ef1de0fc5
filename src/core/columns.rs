//! Column visibility policy.
//!
//! Visible column sets are plain lists of field keys. Fields flagged
//! `always_visible_in_table` can never be hidden, so the policy is reapplied
//! every time a set is read or written.

use crate::core::schema::{self, FieldDefinition, RecordKind};
use crate::errors::{Error, Result};
use tracing::debug;

const EMPLOYEE_PREFERRED: [&str; 4] = [schema::EMPLOYEE_ID, "fullName", "department", "status"];
const EMPLOYEE_FALLBACK_COUNT: usize = 4;
const PAYROLL_PREFERRED: [&str; 4] = [
    schema::EMPLOYEE_FULL_NAME,
    "payrollStatus",
    schema::DISBURSEMENT_DATE,
    schema::BASIC_SALARY,
];

/// Default visible columns for `kind`.
///
/// Employee: the preferred subset present and not hidden in `schema`, or the
/// first four non-hidden fields when none of it is. Payroll: always-visible
/// fields plus the preferred subset, in schema order, with `employeeId` first.
#[must_use]
pub fn default_visible_columns(schema: &[FieldDefinition], kind: RecordKind) -> Vec<String> {
    let visible = || schema.iter().filter(|field| !field.is_hidden);

    match kind {
        RecordKind::Employee => {
            let preferred: Vec<String> = visible()
                .filter(|field| EMPLOYEE_PREFERRED.contains(&field.key))
                .map(|field| field.key.to_string())
                .collect();
            if preferred.is_empty() {
                visible()
                    .take(EMPLOYEE_FALLBACK_COUNT)
                    .map(|field| field.key.to_string())
                    .collect()
            } else {
                preferred
            }
        }
        RecordKind::Payroll => {
            let mut keys: Vec<String> = visible()
                .filter(|field| {
                    field.always_visible_in_table || PAYROLL_PREFERRED.contains(&field.key)
                })
                .map(|field| field.key.to_string())
                .collect();
            keys.retain(|key| key != schema::EMPLOYEE_ID);
            keys.insert(0, schema::EMPLOYEE_ID.to_string());
            keys
        }
    }
}

/// Puts every always-visible key missing from `keys` at the front, then drops
/// duplicates keeping the first occurrence.
#[must_use]
pub fn apply_always_visible(schema: &[FieldDefinition], keys: &[String]) -> Vec<String> {
    let missing = schema
        .iter()
        .filter(|field| field.always_visible_in_table)
        .map(|field| field.key)
        .filter(|key| !keys.iter().any(|k| k.as_str() == *key))
        .map(str::to_string);

    let mut result: Vec<String> = Vec::with_capacity(keys.len() + 1);
    for key in missing.chain(keys.iter().cloned()) {
        if !result.contains(&key) {
            result.push(key);
        }
    }
    result
}

/// A stored column set made safe for the current schema: unknown and hidden
/// keys are dropped and the always-visible policy is reapplied.
#[must_use]
pub fn normalize_stored_columns(kind: RecordKind, stored: &[String]) -> Vec<String> {
    let schema = kind.schema();
    let known: Vec<String> = stored
        .iter()
        .filter(|key| {
            let known = schema::find_field(schema, key).is_some_and(|field| !field.is_hidden);
            if !known {
                debug!("Dropping unknown column '{}' for {:?}", key, kind);
            }
            known
        })
        .cloned()
        .collect();
    apply_always_visible(schema, &known)
}

/// Shows `key` if it is hidden, hides it if it is shown.
///
/// # Errors
/// `Error::NotFound` if `key` is not a visible field of `schema`,
/// `Error::Precondition` when hiding an always-visible column.
pub fn toggle_column(schema: &[FieldDefinition], keys: &[String], key: &str) -> Result<Vec<String>> {
    let field = schema::find_field(schema, key)
        .filter(|field| !field.is_hidden)
        .ok_or_else(|| Error::NotFound {
            entity: "Column",
            key: key.to_string(),
        })?;

    let mut keys = apply_always_visible(schema, keys);
    if let Some(position) = keys.iter().position(|k| k == key) {
        if field.always_visible_in_table {
            return Err(Error::Precondition {
                message: format!("Column '{}' is always visible.", field.label),
            });
        }
        keys.remove(position);
    } else {
        keys.push(key.to_string());
    }
    Ok(keys)
}
