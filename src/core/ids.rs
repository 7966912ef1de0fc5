//! Identifier generators.
//!
//! Surrogate ids are opaque random strings; consumers never parse them.
//! Employee ids are human-facing and sequential: `E` followed by a number
//! zero-padded to three digits.

use crate::{
    core::{records::Employee, schema},
    errors::{Error, Result},
};
use uuid::Uuid;

const SURROGATE_ID_PREFIX: &str = "internal_";
const EMPLOYEE_ID_PREFIX: char = 'E';

/// Generates a fresh surrogate id backed by a random v4 UUID.
#[must_use]
pub fn new_surrogate_id() -> String {
    format!("{SURROGATE_ID_PREFIX}{}", Uuid::new_v4().simple())
}

/// Numeric suffix of an employee id of the form `E<digits>`.
#[must_use]
pub fn employee_id_sequence(employee_id: &str) -> Option<u64> {
    let digits = employee_id.strip_prefix(EMPLOYEE_ID_PREFIX)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Formats a sequence number as an employee id. Widths beyond three digits
/// are kept as-is (`1000` becomes `E1000`).
#[must_use]
pub fn format_employee_id(sequence: u64) -> String {
    format!("{EMPLOYEE_ID_PREFIX}{sequence:03}")
}

/// Highest numeric suffix among `existing`, or 0 when none match `E<digits>`.
#[must_use]
pub fn max_employee_sequence(existing: &[Employee]) -> u64 {
    existing
        .iter()
        .filter_map(|employee| employee_id_sequence(&employee.employee_id))
        .max()
        .unwrap_or(0)
}

/// Next sequential employee id: one past the highest existing suffix.
///
/// # Errors
/// `Error::Validation` when the highest suffix is already `u64::MAX`.
pub fn next_employee_id(existing: &[Employee]) -> Result<String> {
    let latest = max_employee_sequence(existing);
    let next = latest.checked_add(1).ok_or_else(|| {
        Error::validation(
            schema::EMPLOYEE_ID,
            format!("No employee ID left after {}.", format_employee_id(latest)),
        )
    })?;
    Ok(format_employee_id(next))
}
