//! Schema-driven field validation.
//!
//! Rules come from the field definitions: required-ness, and format checks
//! for email, telephone and number fields. Format checks only run on
//! non-empty values. System-owned, hidden and calculated fields are never
//! validated here; the record store guards those itself.

use crate::core::records::{FormNumber, SchemaRecord};
use crate::core::schema::{FieldDefinition, ValueType};
use crate::errors::{Error, Result};
use regex::Regex;
use std::sync::LazyLock;

const PHONE_MIN_DIGITS: usize = 7;
const PHONE_MAX_DIGITS: usize = 15;

/// How required-ness is decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationMode {
    /// Every user-entered field is required (new employee records).
    Creation,
    /// Each field's own `is_required` flag applies.
    Standard,
}

/// A single failed field check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Schema key of the failing field
    pub field: &'static str,
    pub message: String,
}

impl From<FieldError> for Error {
    fn from(error: FieldError) -> Self {
        Self::validation(error.field, error.message)
    }
}

/// Loose email shape: non-space run, `@`, non-space run, `.`, non-space run.
#[allow(clippy::expect_used)]
static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\S+@\S+\.\S+").expect("email pattern is valid"));

/// True when `value` contains something shaped like an email address.
#[must_use]
pub fn is_valid_email(value: &str) -> bool {
    EMAIL_PATTERN.is_match(value)
}

/// Telephone numbers must contain 7 to 15 digits once formatting is stripped.
#[must_use]
pub fn is_valid_phone(value: &str) -> bool {
    let digits = value.chars().filter(char::is_ascii_digit).count();
    (PHONE_MIN_DIGITS..=PHONE_MAX_DIGITS).contains(&digits)
}

fn check_field<R: SchemaRecord>(
    record: &R,
    field: &FieldDefinition,
    mode: ValidationMode,
) -> Option<FieldError> {
    let text = record.field_text(field.key).unwrap_or_default();
    let value = text.trim();

    let required = match mode {
        ValidationMode::Creation => true,
        ValidationMode::Standard => field.is_required,
    };

    let message = if value.is_empty() {
        if !required {
            return None;
        }
        match mode {
            ValidationMode::Creation => format!("{} cannot be empty.", field.label),
            ValidationMode::Standard => format!("{} is required.", field.label),
        }
    } else {
        match field.value_type {
            ValueType::Email if !is_valid_email(value) => "Invalid email format.".to_string(),
            ValueType::Telephone if !is_valid_phone(value) => {
                format!("Phone must be {PHONE_MIN_DIGITS}-{PHONE_MAX_DIGITS} digits.")
            }
            ValueType::Number if required && FormNumber::from(value).value().is_none() => {
                format!("{} must be a valid number.", field.label)
            }
            _ => return None,
        }
    };

    Some(FieldError {
        field: field.key,
        message,
    })
}

/// Collects every failing field of `record`, in schema order.
#[must_use]
pub fn collect_field_errors<R: SchemaRecord>(record: &R, mode: ValidationMode) -> Vec<FieldError> {
    R::KIND
        .schema()
        .iter()
        .filter(|field| field.is_user_input())
        .filter_map(|field| check_field(record, field, mode))
        .collect()
}

/// Validates `record`, failing with the first field error in schema order.
///
/// # Errors
/// Returns `Error::Validation` naming the first failing field.
pub fn validate_record<R: SchemaRecord>(record: &R, mode: ValidationMode) -> Result<()> {
    match collect_field_errors(record, mode).into_iter().next() {
        Some(error) => Err(error.into()),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::records::{Employee, EmployeeInput, PayrollInput};
    use chrono::NaiveDate;

    fn complete_employee() -> Employee {
        Employee::from_input(
            "internal_1".to_string(),
            EmployeeInput {
                employee_id: Some("E001".to_string()),
                full_name: Some("Grace Hopper".to_string()),
                department: Some("Engineering".to_string()),
                job_title: Some("Rear Admiral".to_string()),
                date_of_joining: NaiveDate::from_ymd_opt(2020, 3, 1),
                email: Some("grace@example.com".to_string()),
                phone_number: Some("+1 (555) 010-2030".to_string()),
                status: None,
            },
        )
    }

    #[test]
    fn test_email_pattern() {
        assert!(is_valid_email("a@b.co"));
        assert!(is_valid_email("first.last@example.org"));
        assert!(is_valid_email("junk a@b.c junk"));
        assert!(is_valid_email("a@b.c.d"));
        assert!(!is_valid_email("@b.co"));
        assert!(!is_valid_email("a@.co"));
        assert!(!is_valid_email("a@b."));
        assert!(!is_valid_email("a@bco"));
        assert!(!is_valid_email("a @b.co"));
        assert!(!is_valid_email("plainaddress"));
    }

    #[test]
    fn test_phone_digit_count() {
        assert!(is_valid_phone("555-0102"));
        assert!(is_valid_phone("+1 (555) 010-2030"));
        assert!(is_valid_phone("123456789012345"));
        assert!(!is_valid_phone("123456"));
        assert!(!is_valid_phone("1234567890123456"));
        assert!(!is_valid_phone("phone"));
    }

    #[test]
    fn test_complete_employee_passes_creation() {
        assert!(validate_record(&complete_employee(), ValidationMode::Creation).is_ok());
    }

    #[test]
    fn test_creation_requires_optional_fields() {
        let mut employee = complete_employee();
        employee.department = "  ".to_string();

        let errors = collect_field_errors(&employee, ValidationMode::Creation);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "department");
        assert_eq!(errors[0].message, "Department cannot be empty.");

        // Department is optional once the record exists
        assert!(validate_record(&employee, ValidationMode::Standard).is_ok());
    }

    #[test]
    fn test_creation_requires_date_of_joining() {
        let mut employee = complete_employee();
        employee.date_of_joining = None;
        let result = validate_record(&employee, ValidationMode::Creation);
        assert!(matches!(
            result,
            Err(Error::Validation { ref field, .. }) if field == "dateOfJoining"
        ));
    }

    #[test]
    fn test_standard_mode_required_fields() {
        let mut employee = complete_employee();
        employee.full_name = String::new();
        employee.email = String::new();

        let errors = collect_field_errors(&employee, ValidationMode::Standard);
        let fields: Vec<&str> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["fullName", "email"]);
        assert_eq!(errors[0].message, "Full Name is required.");
    }

    #[test]
    fn test_format_checks() {
        let mut employee = complete_employee();
        employee.email = "not-an-email".to_string();
        employee.phone_number = "12-34".to_string();

        let errors = collect_field_errors(&employee, ValidationMode::Standard);
        assert_eq!(
            errors,
            vec![
                FieldError {
                    field: "email",
                    message: "Invalid email format.".to_string(),
                },
                FieldError {
                    field: "phoneNumber",
                    message: "Phone must be 7-15 digits.".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_empty_optional_phone_is_not_format_checked() {
        let mut employee = complete_employee();
        employee.phone_number = String::new();
        assert!(validate_record(&employee, ValidationMode::Standard).is_ok());
    }

    #[test]
    fn test_payroll_required_fields() {
        let input = PayrollInput::with_defaults("E001");
        let errors = collect_field_errors(&input, ValidationMode::Standard);
        let fields: Vec<&str> = errors.iter().map(|e| e.field).collect();
        // Only the disbursement date lacks a default
        assert_eq!(fields, vec!["disbursementDate"]);
    }

    #[test]
    fn test_payroll_basic_salary_must_be_numeric() {
        let input = PayrollInput {
            disbursement_date: NaiveDate::from_ymd_opt(2024, 1, 1),
            basic_salary: Some(FormNumber::from("lots")),
            ..PayrollInput::with_defaults("E001")
        };
        let result = validate_record(&input, ValidationMode::Standard);
        assert!(matches!(
            result,
            Err(Error::Validation { ref field, ref message })
                if field == "basicSalary" && message == "Basic Salary must be a valid number."
        ));
    }

    #[test]
    fn test_payroll_optional_numbers_are_not_checked() {
        let input = PayrollInput {
            disbursement_date: NaiveDate::from_ymd_opt(2024, 1, 1),
            telephone_allowance_fixed: Some(FormNumber::from("n/a")),
            ..PayrollInput::with_defaults("E001")
        };
        assert!(validate_record(&input, ValidationMode::Standard).is_ok());
    }
}
