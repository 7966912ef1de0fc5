//! Typed employee and payroll records.
//!
//! Stored records (`Employee`, `Payroll`) are complete and strongly typed.
//! Inputs (`EmployeeInput`, `PayrollInput`) carry partially filled form state:
//! every field is optional, and `None` means "not submitted", so merging an
//! input over a stored record only touches what the caller sent.
//!
//! All records serialize with the camelCase keys used by the schema registry,
//! which is also the persisted JSON layout.

use crate::core::schema::{self, DefaultValue, RecordKind};
use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use std::{fmt, sync::LazyLock};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Employment status of an employee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EmployeeStatus {
    #[default]
    Active,
    #[serde(rename = "On Leave")]
    OnLeave,
    Terminated,
}

impl EmployeeStatus {
    /// Display and storage text.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::OnLeave => "On Leave",
            Self::Terminated => "Terminated",
        }
    }

    /// Only terminated employees may be removed from the system.
    #[must_use]
    pub const fn allows_deletion(self) -> bool {
        matches!(self, Self::Terminated)
    }
}

impl fmt::Display for EmployeeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Processing state of a payroll record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PayrollStatus {
    #[default]
    Pending,
    Processed,
    Paid,
    #[serde(rename = "On Hold")]
    OnHold,
    Cancelled,
}

impl PayrollStatus {
    /// Display and storage text.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Processed => "Processed",
            Self::Paid => "Paid",
            Self::OnHold => "On Hold",
            Self::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for PayrollStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepts a date, an empty string, or null. Older stored data writes an
/// unset date as `""`.
fn optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => NaiveDate::parse_from_str(text, DATE_FORMAT)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

fn format_date(date: Option<NaiveDate>) -> Option<String> {
    date.map(|d| d.format(DATE_FORMAT).to_string())
}

/// Read access to a record's fields by schema key, used by schema-driven
/// validation, search and table rendering.
pub trait SchemaRecord {
    /// The record kind whose schema describes this type.
    const KIND: RecordKind;

    /// Display text of the field named `key`, or `None` when it has no value
    /// or the key is not part of this record.
    fn field_text(&self, key: &str) -> Option<String>;
}

/// A stored employee profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    /// Surrogate id, generated at creation and never changed
    pub internal_id: String,
    /// Business key (`E001`, `E002`, ...), immutable after creation
    pub employee_id: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub job_title: String,
    #[serde(default, deserialize_with = "optional_date")]
    pub date_of_joining: Option<NaiveDate>,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub status: EmployeeStatus,
}

impl Employee {
    /// Builds a new employee from submitted data. Fields that were not
    /// submitted take their schema defaults (empty text, `Active` status).
    #[must_use]
    pub fn from_input(internal_id: String, input: EmployeeInput) -> Self {
        Self {
            internal_id,
            employee_id: input.employee_id.unwrap_or_default(),
            full_name: input.full_name.unwrap_or_default(),
            department: input.department.unwrap_or_default(),
            job_title: input.job_title.unwrap_or_default(),
            date_of_joining: input.date_of_joining,
            email: input.email.unwrap_or_default(),
            phone_number: input.phone_number.unwrap_or_default(),
            status: input.status.unwrap_or_default(),
        }
    }

    /// Returns a copy with `input` merged over it. The surrogate id and the
    /// employee id are system-owned and keep their stored values.
    #[must_use]
    pub fn merged(&self, input: EmployeeInput) -> Self {
        Self {
            internal_id: self.internal_id.clone(),
            employee_id: self.employee_id.clone(),
            full_name: input.full_name.unwrap_or_else(|| self.full_name.clone()),
            department: input.department.unwrap_or_else(|| self.department.clone()),
            job_title: input.job_title.unwrap_or_else(|| self.job_title.clone()),
            date_of_joining: input.date_of_joining.or(self.date_of_joining),
            email: input.email.unwrap_or_else(|| self.email.clone()),
            phone_number: input
                .phone_number
                .unwrap_or_else(|| self.phone_number.clone()),
            status: input.status.unwrap_or(self.status),
        }
    }
}

impl SchemaRecord for Employee {
    const KIND: RecordKind = RecordKind::Employee;

    fn field_text(&self, key: &str) -> Option<String> {
        let text = match key {
            schema::INTERNAL_ID => self.internal_id.clone(),
            schema::EMPLOYEE_ID => self.employee_id.clone(),
            "fullName" => self.full_name.clone(),
            "department" => self.department.clone(),
            "jobTitle" => self.job_title.clone(),
            "dateOfJoining" => return format_date(self.date_of_joining),
            "email" => self.email.clone(),
            "phoneNumber" => self.phone_number.clone(),
            "status" => self.status.as_str().to_string(),
            _ => return None,
        };
        Some(text)
    }
}

/// Submitted employee data. `None` leaves a field untouched on update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmployeeInput {
    /// Only honoured at creation
    pub employee_id: Option<String>,
    pub full_name: Option<String>,
    pub department: Option<String>,
    pub job_title: Option<String>,
    #[serde(deserialize_with = "optional_date")]
    pub date_of_joining: Option<NaiveDate>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub status: Option<EmployeeStatus>,
}

/// A numeric form value as typed by a user: either a number or raw text.
///
/// Text is read the way a lenient form parser reads it: surrounding
/// whitespace is ignored and the longest leading numeric prefix is used,
/// so `"12.5 kg"` reads as `12.5` and `"abc"` has no value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FormNumber {
    Number(f64),
    Text(String),
}

impl FormNumber {
    /// The numeric value, or `None` when the text holds no leading number or
    /// the value is not finite.
    #[must_use]
    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n).filter(|n| n.is_finite()),
            Self::Text(text) => parse_number_prefix(text),
        }
    }

    /// The numeric value, defaulting to 0 when absent or malformed.
    #[must_use]
    pub fn coerce(&self) -> f64 {
        self.value().unwrap_or(0.0)
    }

    fn display_text(&self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Text(text) => text.trim().to_string(),
        }
    }
}

impl From<f64> for FormNumber {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for FormNumber {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// Leading decimal number: optional sign, digits with an optional fraction
/// (or a bare fraction), optional exponent.
#[allow(clippy::expect_used)]
static NUMBER_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?([0-9]+\.?[0-9]*|\.[0-9]+)([eE][+-]?[0-9]+)?")
        .expect("number pattern is valid")
});

/// Parses the longest leading decimal number of `text`, ignoring
/// surrounding whitespace.
fn parse_number_prefix(text: &str) -> Option<f64> {
    NUMBER_PREFIX
        .find(text.trim())
        .and_then(|prefix| prefix.as_str().parse::<f64>().ok())
        .filter(|value| value.is_finite())
}

/// Payroll form state. Numeric fields accept numbers or raw text; the
/// calculator coerces them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PayrollInput {
    /// Business key of the owning employee
    pub employee_id: String,
    #[serde(deserialize_with = "optional_date")]
    pub disbursement_date: Option<NaiveDate>,
    pub payroll_status: Option<PayrollStatus>,
    pub basic_salary: Option<FormNumber>,
    pub house_rent_allowance_percentage: Option<FormNumber>,
    pub medical_allowance_percentage: Option<FormNumber>,
    pub conveyance_allowance_fixed: Option<FormNumber>,
    pub telephone_allowance_fixed: Option<FormNumber>,
    pub special_allowance_fixed: Option<FormNumber>,
    pub other_allowances_fixed: Option<FormNumber>,
    pub income_tax_percentage: Option<FormNumber>,
    pub other_deductions_fixed: Option<FormNumber>,
}

impl PayrollInput {
    /// Empty form state for `employee_id`.
    #[must_use]
    pub fn new(employee_id: impl Into<String>) -> Self {
        Self {
            employee_id: employee_id.into(),
            ..Self::default()
        }
    }

    /// Form state initialized from the payroll schema's default values.
    #[must_use]
    pub fn with_defaults(employee_id: impl Into<String>) -> Self {
        let mut input = Self::new(employee_id);
        input.payroll_status = Some(PayrollStatus::default());
        for field in schema::payroll_schema() {
            if let (Some(DefaultValue::Number(value)), Some(slot)) =
                (field.default_value, input.number_slot_mut(field.key))
            {
                *slot = Some(FormNumber::Number(value));
            }
        }
        input
    }

    /// Numeric input field by schema key.
    #[must_use]
    pub fn number(&self, key: &str) -> Option<&FormNumber> {
        let slot = match key {
            "basicSalary" => &self.basic_salary,
            "houseRentAllowancePercentage" => &self.house_rent_allowance_percentage,
            "medicalAllowancePercentage" => &self.medical_allowance_percentage,
            "conveyanceAllowanceFixed" => &self.conveyance_allowance_fixed,
            "telephoneAllowanceFixed" => &self.telephone_allowance_fixed,
            "specialAllowanceFixed" => &self.special_allowance_fixed,
            "otherAllowancesFixed" => &self.other_allowances_fixed,
            "incomeTaxPercentage" => &self.income_tax_percentage,
            "otherDeductionsFixed" => &self.other_deductions_fixed,
            _ => return None,
        };
        slot.as_ref()
    }

    fn number_slot_mut(&mut self, key: &str) -> Option<&mut Option<FormNumber>> {
        let slot = match key {
            "basicSalary" => &mut self.basic_salary,
            "houseRentAllowancePercentage" => &mut self.house_rent_allowance_percentage,
            "medicalAllowancePercentage" => &mut self.medical_allowance_percentage,
            "conveyanceAllowanceFixed" => &mut self.conveyance_allowance_fixed,
            "telephoneAllowanceFixed" => &mut self.telephone_allowance_fixed,
            "specialAllowanceFixed" => &mut self.special_allowance_fixed,
            "otherAllowancesFixed" => &mut self.other_allowances_fixed,
            "incomeTaxPercentage" => &mut self.income_tax_percentage,
            "otherDeductionsFixed" => &mut self.other_deductions_fixed,
            _ => return None,
        };
        Some(slot)
    }

    /// Returns `self` with every submitted field of `update` laid over it.
    /// The employee id is the upsert key and is never changed by a merge.
    #[must_use]
    pub fn merged(mut self, update: Self) -> Self {
        self.disbursement_date = update.disbursement_date.or(self.disbursement_date);
        self.payroll_status = update.payroll_status.or(self.payroll_status);
        let Self {
            basic_salary,
            house_rent_allowance_percentage,
            medical_allowance_percentage,
            conveyance_allowance_fixed,
            telephone_allowance_fixed,
            special_allowance_fixed,
            other_allowances_fixed,
            income_tax_percentage,
            other_deductions_fixed,
            ..
        } = update;
        let updates = [
            ("basicSalary", basic_salary),
            ("houseRentAllowancePercentage", house_rent_allowance_percentage),
            ("medicalAllowancePercentage", medical_allowance_percentage),
            ("conveyanceAllowanceFixed", conveyance_allowance_fixed),
            ("telephoneAllowanceFixed", telephone_allowance_fixed),
            ("specialAllowanceFixed", special_allowance_fixed),
            ("otherAllowancesFixed", other_allowances_fixed),
            ("incomeTaxPercentage", income_tax_percentage),
            ("otherDeductionsFixed", other_deductions_fixed),
        ];
        for (key, value) in updates {
            if let (Some(value), Some(slot)) = (value, self.number_slot_mut(key)) {
                *slot = Some(value);
            }
        }
        self
    }
}

impl SchemaRecord for PayrollInput {
    const KIND: RecordKind = RecordKind::Payroll;

    fn field_text(&self, key: &str) -> Option<String> {
        match key {
            schema::EMPLOYEE_ID => Some(self.employee_id.clone()),
            schema::DISBURSEMENT_DATE => format_date(self.disbursement_date),
            "payrollStatus" => self.payroll_status.map(|s| s.as_str().to_string()),
            _ => self.number(key).map(FormNumber::display_text),
        }
    }
}

/// A fully derived payroll record: coerced inputs plus calculated figures.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PayrollRecord {
    pub employee_id: String,
    #[serde(deserialize_with = "optional_date")]
    pub disbursement_date: Option<NaiveDate>,
    pub payroll_status: PayrollStatus,
    pub basic_salary: f64,
    pub house_rent_allowance_percentage: f64,
    pub medical_allowance_percentage: f64,
    pub conveyance_allowance_fixed: f64,
    pub telephone_allowance_fixed: f64,
    pub special_allowance_fixed: f64,
    pub other_allowances_fixed: f64,
    pub income_tax_percentage: f64,
    pub other_deductions_fixed: f64,
    pub house_rent_amount: f64,
    pub medical_amount: f64,
    pub gross_salary: f64,
    pub income_tax_amount: f64,
    pub total_deductions: f64,
    pub net_salary: f64,
}

impl PayrollRecord {
    /// Every numeric field paired with its schema key.
    #[must_use]
    pub const fn numeric_fields(&self) -> [(&'static str, f64); 15] {
        [
            ("basicSalary", self.basic_salary),
            ("houseRentAllowancePercentage", self.house_rent_allowance_percentage),
            ("medicalAllowancePercentage", self.medical_allowance_percentage),
            ("conveyanceAllowanceFixed", self.conveyance_allowance_fixed),
            ("telephoneAllowanceFixed", self.telephone_allowance_fixed),
            ("specialAllowanceFixed", self.special_allowance_fixed),
            ("otherAllowancesFixed", self.other_allowances_fixed),
            ("incomeTaxPercentage", self.income_tax_percentage),
            ("otherDeductionsFixed", self.other_deductions_fixed),
            ("houseRentAmount", self.house_rent_amount),
            ("medicalAmount", self.medical_amount),
            ("grossSalary", self.gross_salary),
            ("incomeTaxAmount", self.income_tax_amount),
            ("totalDeductions", self.total_deductions),
            ("netSalary", self.net_salary),
        ]
    }

    /// Mutable access to every numeric field paired with its schema key.
    pub fn numeric_fields_mut(&mut self) -> [(&'static str, &mut f64); 15] {
        [
            ("basicSalary", &mut self.basic_salary),
            ("houseRentAllowancePercentage", &mut self.house_rent_allowance_percentage),
            ("medicalAllowancePercentage", &mut self.medical_allowance_percentage),
            ("conveyanceAllowanceFixed", &mut self.conveyance_allowance_fixed),
            ("telephoneAllowanceFixed", &mut self.telephone_allowance_fixed),
            ("specialAllowanceFixed", &mut self.special_allowance_fixed),
            ("otherAllowancesFixed", &mut self.other_allowances_fixed),
            ("incomeTaxPercentage", &mut self.income_tax_percentage),
            ("otherDeductionsFixed", &mut self.other_deductions_fixed),
            ("houseRentAmount", &mut self.house_rent_amount),
            ("medicalAmount", &mut self.medical_amount),
            ("grossSalary", &mut self.gross_salary),
            ("incomeTaxAmount", &mut self.income_tax_amount),
            ("totalDeductions", &mut self.total_deductions),
            ("netSalary", &mut self.net_salary),
        ]
    }

    /// Numeric field by schema key.
    #[must_use]
    pub fn number(&self, key: &str) -> Option<f64> {
        self.numeric_fields()
            .into_iter()
            .find_map(|(field, value)| (field == key).then_some(value))
    }
}

impl From<&PayrollRecord> for PayrollInput {
    fn from(record: &PayrollRecord) -> Self {
        Self {
            employee_id: record.employee_id.clone(),
            disbursement_date: record.disbursement_date,
            payroll_status: Some(record.payroll_status),
            basic_salary: Some(record.basic_salary.into()),
            house_rent_allowance_percentage: Some(record.house_rent_allowance_percentage.into()),
            medical_allowance_percentage: Some(record.medical_allowance_percentage.into()),
            conveyance_allowance_fixed: Some(record.conveyance_allowance_fixed.into()),
            telephone_allowance_fixed: Some(record.telephone_allowance_fixed.into()),
            special_allowance_fixed: Some(record.special_allowance_fixed.into()),
            other_allowances_fixed: Some(record.other_allowances_fixed.into()),
            income_tax_percentage: Some(record.income_tax_percentage.into()),
            other_deductions_fixed: Some(record.other_deductions_fixed.into()),
        }
    }
}

impl SchemaRecord for PayrollRecord {
    const KIND: RecordKind = RecordKind::Payroll;

    fn field_text(&self, key: &str) -> Option<String> {
        match key {
            schema::EMPLOYEE_ID => Some(self.employee_id.clone()),
            schema::DISBURSEMENT_DATE => format_date(self.disbursement_date),
            "payrollStatus" => Some(self.payroll_status.as_str().to_string()),
            _ => self.number(key).map(|value| value.to_string()),
        }
    }
}

/// A stored payroll record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payroll {
    /// Surrogate id, generated at first insert
    #[serde(rename = "internalId")]
    pub internal_id: String,
    #[serde(flatten)]
    pub record: PayrollRecord,
}

impl SchemaRecord for Payroll {
    const KIND: RecordKind = RecordKind::Payroll;

    fn field_text(&self, key: &str) -> Option<String> {
        if key == schema::INTERNAL_ID {
            return Some(self.internal_id.clone());
        }
        self.record.field_text(key)
    }
}
