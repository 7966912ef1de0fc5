//! Schema registry - Static field definitions for employee and payroll records.
//!
//! The two schemas are the single source of truth for field order, labels,
//! value types and behavioural flags. Validation, metric rounding, column
//! visibility and search all read these definitions instead of hard-coding
//! per-field rules. Field order is significant: it is the canonical form and
//! table column order.

use serde::Serialize;

/// Surrogate id key shared by both record kinds.
pub const INTERNAL_ID: &str = "internalId";
/// Business key shared by both record kinds.
pub const EMPLOYEE_ID: &str = "employeeId";
/// Display-only payroll column filled from the owning employee.
pub const EMPLOYEE_FULL_NAME: &str = "employeeFullName";
/// Payroll field that is frozen once set.
pub const DISBURSEMENT_DATE: &str = "disbursementDate";
/// Payroll field kept at its coerced value, never rounded.
pub const BASIC_SALARY: &str = "basicSalary";

/// Value type of a field, driving form widgets and format validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    Text,
    Number,
    Date,
    Select,
    Email,
    #[serde(rename = "tel")]
    Telephone,
}

/// Value used when initializing a new record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DefaultValue {
    Text(&'static str),
    Number(f64),
}

/// Describes one attribute of a record kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefinition {
    /// Unique key within the schema; also the JSON property name
    pub key: &'static str,
    /// Display name
    pub label: &'static str,
    pub value_type: ValueType,
    /// Managed internally, never user-entered
    pub is_system_owned: bool,
    /// Must be non-empty before the record is persisted
    pub is_required: bool,
    /// False for write-once or system-controlled fields
    pub is_editable: bool,
    /// False when the field may be set at creation but is frozen afterwards
    pub is_editable_after_creation: bool,
    /// Always produced by the payroll calculator
    pub is_calculated: bool,
    /// Excluded from every form and table
    pub is_hidden: bool,
    /// Rendered as a form input (possibly read-only)
    pub in_form: bool,
    pub default_value: Option<DefaultValue>,
    /// Enumerated choices for `select` fields
    pub options: &'static [&'static str],
    /// Column cannot be hidden by user preference
    pub always_visible_in_table: bool,
    /// Presentation emphasis (headline figures)
    pub highly_visible: bool,
    /// Short helper text shown next to the input
    pub hint: Option<&'static str>,
}

impl FieldDefinition {
    const fn new(key: &'static str, label: &'static str, value_type: ValueType) -> Self {
        Self {
            key,
            label,
            value_type,
            is_system_owned: false,
            is_required: false,
            is_editable: true,
            is_editable_after_creation: true,
            is_calculated: false,
            is_hidden: false,
            in_form: true,
            default_value: None,
            options: &[],
            always_visible_in_table: false,
            highly_visible: false,
            hint: None,
        }
    }

    const fn system(mut self) -> Self {
        self.is_system_owned = true;
        self.is_editable = false;
        self
    }

    const fn required(mut self) -> Self {
        self.is_required = true;
        self
    }

    const fn hidden(mut self) -> Self {
        self.is_hidden = true;
        self
    }

    const fn not_in_form(mut self) -> Self {
        self.in_form = false;
        self
    }

    const fn calculated(mut self) -> Self {
        self.is_calculated = true;
        self.is_editable = false;
        self
    }

    const fn frozen_after_creation(mut self) -> Self {
        self.is_editable_after_creation = false;
        self
    }

    const fn default_text(mut self, value: &'static str) -> Self {
        self.default_value = Some(DefaultValue::Text(value));
        self
    }

    const fn default_number(mut self, value: f64) -> Self {
        self.default_value = Some(DefaultValue::Number(value));
        self
    }

    const fn options(mut self, options: &'static [&'static str]) -> Self {
        self.options = options;
        self
    }

    const fn always_visible(mut self) -> Self {
        self.always_visible_in_table = true;
        self
    }

    const fn highlighted(mut self) -> Self {
        self.highly_visible = true;
        self
    }

    const fn hint(mut self, hint: &'static str) -> Self {
        self.hint = Some(hint);
        self
    }

    /// True for fields a user fills in directly: shown in the form, not
    /// hidden, not system-owned and not calculated.
    #[must_use]
    pub const fn is_user_input(&self) -> bool {
        self.in_form && !self.is_hidden && !self.is_system_owned && !self.is_calculated
    }
}

/// Employee status options, in display order.
pub const EMPLOYEE_STATUS_OPTIONS: &[&str] = &["Active", "On Leave", "Terminated"];

/// Payroll status options, in display order.
pub const PAYROLL_STATUS_OPTIONS: &[&str] = &["Pending", "Processed", "Paid", "On Hold", "Cancelled"];

static EMPLOYEE_SCHEMA: [FieldDefinition; 9] = [
    FieldDefinition::new(INTERNAL_ID, "Internal ID", ValueType::Text)
        .system()
        .hidden(),
    FieldDefinition::new(EMPLOYEE_ID, "Employee ID", ValueType::Text)
        .system()
        .required(),
    FieldDefinition::new("fullName", "Full Name", ValueType::Text).required(),
    FieldDefinition::new("department", "Department", ValueType::Text),
    FieldDefinition::new("jobTitle", "Job Title", ValueType::Text),
    FieldDefinition::new("dateOfJoining", "Date of Joining", ValueType::Date),
    FieldDefinition::new("email", "Email", ValueType::Email).required(),
    FieldDefinition::new("phoneNumber", "Phone Number", ValueType::Telephone),
    FieldDefinition::new("status", "Status", ValueType::Select)
        .options(EMPLOYEE_STATUS_OPTIONS)
        .default_text("Active"),
];

static PAYROLL_SCHEMA: [FieldDefinition; 20] = [
    FieldDefinition::new(INTERNAL_ID, "Internal ID", ValueType::Text)
        .system()
        .hidden(),
    FieldDefinition::new(EMPLOYEE_ID, "Employee ID", ValueType::Text)
        .system()
        .required()
        .not_in_form()
        .always_visible(),
    FieldDefinition::new(EMPLOYEE_FULL_NAME, "Full Name", ValueType::Text)
        .system()
        .calculated()
        .not_in_form(),
    FieldDefinition::new(DISBURSEMENT_DATE, "Disbursement Date", ValueType::Date)
        .required()
        .frozen_after_creation()
        .default_text(""),
    FieldDefinition::new("payrollStatus", "Payroll Status", ValueType::Select)
        .options(PAYROLL_STATUS_OPTIONS)
        .default_text("Pending")
        .required(),
    FieldDefinition::new(BASIC_SALARY, "Basic Salary", ValueType::Number)
        .required()
        .default_number(0.0),
    FieldDefinition::new("houseRentAllowancePercentage", "HRA (%)", ValueType::Number)
        .default_number(40.0)
        .hint("Of Basic"),
    FieldDefinition::new("medicalAllowancePercentage", "Medical (%)", ValueType::Number)
        .default_number(10.0)
        .hint("Of Basic"),
    FieldDefinition::new("conveyanceAllowanceFixed", "Conveyance", ValueType::Number)
        .default_number(0.0),
    FieldDefinition::new("telephoneAllowanceFixed", "Telephone", ValueType::Number)
        .default_number(0.0),
    FieldDefinition::new("specialAllowanceFixed", "Special Allow.", ValueType::Number)
        .default_number(0.0),
    FieldDefinition::new("otherAllowancesFixed", "Other Allow.", ValueType::Number)
        .default_number(0.0),
    FieldDefinition::new("incomeTaxPercentage", "Income Tax (%)", ValueType::Number)
        .default_number(0.0)
        .hint("Of Gross (Simplified)"),
    FieldDefinition::new("otherDeductionsFixed", "Other Deduct.", ValueType::Number)
        .default_number(0.0),
    FieldDefinition::new("houseRentAmount", "HRA Amt", ValueType::Number).calculated(),
    FieldDefinition::new("medicalAmount", "Medical Amt", ValueType::Number).calculated(),
    FieldDefinition::new("grossSalary", "Gross Salary", ValueType::Number)
        .calculated()
        .highlighted(),
    FieldDefinition::new("incomeTaxAmount", "Income Tax Amt", ValueType::Number).calculated(),
    FieldDefinition::new("totalDeductions", "Total Deduct.", ValueType::Number).calculated(),
    FieldDefinition::new("netSalary", "Net Salary", ValueType::Number)
        .calculated()
        .highlighted(),
];

/// The two record kinds the registry describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RecordKind {
    Employee,
    Payroll,
}

impl RecordKind {
    /// Ordered field definitions for this kind.
    #[must_use]
    pub fn schema(self) -> &'static [FieldDefinition] {
        match self {
            Self::Employee => employee_schema(),
            Self::Payroll => payroll_schema(),
        }
    }

    /// Entity name used in error messages and logs.
    #[must_use]
    pub const fn entity_name(self) -> &'static str {
        match self {
            Self::Employee => "Employee",
            Self::Payroll => "Payroll",
        }
    }
}

/// Ordered employee field definitions.
#[must_use]
pub fn employee_schema() -> &'static [FieldDefinition] {
    &EMPLOYEE_SCHEMA
}

/// Ordered payroll field definitions.
#[must_use]
pub fn payroll_schema() -> &'static [FieldDefinition] {
    &PAYROLL_SCHEMA
}

/// Looks up a field by key.
#[must_use]
pub fn find_field<'a>(schema: &'a [FieldDefinition], key: &str) -> Option<&'a FieldDefinition> {
    schema.iter().find(|field| field.key == key)
}

/// True when `key` names a field the calculator keeps at full precision.
/// Percentages and the basic salary are never rounded; every other numeric
/// payroll figure is rounded to cents.
#[must_use]
pub fn is_unrounded_numeric_key(key: &str) -> bool {
    key == BASIC_SALARY || key.to_ascii_lowercase().contains("percentage")
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_schema_keys_are_unique() {
        for kind in [RecordKind::Employee, RecordKind::Payroll] {
            let keys: HashSet<&str> = kind.schema().iter().map(|f| f.key).collect();
            assert_eq!(keys.len(), kind.schema().len(), "{kind:?} has duplicate keys");
        }
    }

    #[test]
    fn test_employee_schema_order() {
        let keys: Vec<&str> = employee_schema().iter().map(|f| f.key).collect();
        assert_eq!(
            keys,
            vec![
                "internalId",
                "employeeId",
                "fullName",
                "department",
                "jobTitle",
                "dateOfJoining",
                "email",
                "phoneNumber",
                "status",
            ]
        );
    }

    #[test]
    fn test_system_fields_are_not_editable() {
        for kind in [RecordKind::Employee, RecordKind::Payroll] {
            for field in kind.schema().iter().filter(|f| f.is_system_owned) {
                assert!(!field.is_editable, "{} should not be editable", field.key);
                assert!(!field.is_user_input());
            }
        }
    }

    #[test]
    fn test_select_fields_have_options() {
        for kind in [RecordKind::Employee, RecordKind::Payroll] {
            for field in kind.schema() {
                if field.value_type == ValueType::Select {
                    assert!(!field.options.is_empty(), "{} has no options", field.key);
                }
            }
        }
    }

    #[test]
    fn test_disbursement_date_is_frozen_after_creation() {
        let field = find_field(payroll_schema(), DISBURSEMENT_DATE).unwrap();
        assert!(field.is_editable);
        assert!(!field.is_editable_after_creation);
        assert!(field.is_required);
    }

    #[test]
    fn test_only_employee_id_is_always_visible() {
        let always: Vec<&str> = payroll_schema()
            .iter()
            .filter(|f| f.always_visible_in_table)
            .map(|f| f.key)
            .collect();
        assert_eq!(always, vec![EMPLOYEE_ID]);
    }

    #[test]
    fn test_calculated_payroll_fields() {
        let calculated: Vec<&str> = payroll_schema()
            .iter()
            .filter(|f| f.is_calculated && !f.is_system_owned)
            .map(|f| f.key)
            .collect();
        assert_eq!(
            calculated,
            vec![
                "houseRentAmount",
                "medicalAmount",
                "grossSalary",
                "incomeTaxAmount",
                "totalDeductions",
                "netSalary",
            ]
        );
    }

    #[test]
    fn test_unrounded_numeric_keys() {
        assert!(is_unrounded_numeric_key("basicSalary"));
        assert!(is_unrounded_numeric_key("houseRentAllowancePercentage"));
        assert!(is_unrounded_numeric_key("incomeTaxPercentage"));
        assert!(!is_unrounded_numeric_key("grossSalary"));
        assert!(!is_unrounded_numeric_key("conveyanceAllowanceFixed"));
    }

    #[test]
    fn test_schema_serializes_as_metadata() {
        let json = serde_json::to_value(employee_schema()).unwrap();
        let phone = &json[7];
        assert_eq!(phone["key"], "phoneNumber");
        assert_eq!(phone["valueType"], "tel");
        assert_eq!(phone["isRequired"], false);

        let status = &json[8];
        assert_eq!(status["defaultValue"], "Active");
        assert_eq!(status["options"][1], "On Leave");
    }
}
