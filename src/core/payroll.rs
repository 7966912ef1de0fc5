//! Payroll metrics calculator.
//!
//! Derives every calculated payroll figure from the editable inputs. The
//! calculator never fails: absent, empty or non-numeric inputs count as 0, so
//! it can run on half-filled form state after every keystroke.
//!
//! Figures are computed at full precision and rounded once at the end. Every
//! numeric field is rounded to cents except the percentages and the basic
//! salary; a non-finite result becomes 0.

use crate::core::records::{FormNumber, PayrollInput, PayrollRecord};
use crate::core::schema::is_unrounded_numeric_key;

fn coerce(value: Option<&FormNumber>) -> f64 {
    value.map_or(0.0, FormNumber::coerce)
}

/// Rounds to 2 decimal places, mapping non-finite values to 0.
///
/// Rounding works on the exact binary value: the literal `2.675` is stored
/// slightly below the half cent and becomes `2.67`. Values that sit exactly
/// on a half cent round away from zero.
#[must_use]
pub fn round_currency(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    // Only odd multiples of 1/8 sit exactly on a half cent
    let eighths = value * 8.0;
    if eighths.fract() == 0.0 && eighths % 2.0 != 0.0 {
        return (value * 100.0).round() / 100.0;
    }
    format!("{value:.2}").parse().unwrap_or(value)
}

/// Computes the full payroll record for `input`.
///
/// 1. `houseRentAmount = basic * hra% / 100`, `medicalAmount = basic * medical% / 100`
/// 2. `grossSalary = basic + houseRentAmount + medicalAmount + fixed allowances`
/// 3. `incomeTaxAmount = gross * tax% / 100`
/// 4. `totalDeductions = incomeTaxAmount + otherDeductionsFixed`
/// 5. `netSalary = gross - totalDeductions`
#[must_use]
pub fn compute_metrics(input: &PayrollInput) -> PayrollRecord {
    let basic_salary = coerce(input.basic_salary.as_ref());

    let mut record = PayrollRecord {
        employee_id: input.employee_id.clone(),
        disbursement_date: input.disbursement_date,
        payroll_status: input.payroll_status.unwrap_or_default(),
        basic_salary,
        house_rent_allowance_percentage: coerce(input.house_rent_allowance_percentage.as_ref()),
        medical_allowance_percentage: coerce(input.medical_allowance_percentage.as_ref()),
        conveyance_allowance_fixed: coerce(input.conveyance_allowance_fixed.as_ref()),
        telephone_allowance_fixed: coerce(input.telephone_allowance_fixed.as_ref()),
        special_allowance_fixed: coerce(input.special_allowance_fixed.as_ref()),
        other_allowances_fixed: coerce(input.other_allowances_fixed.as_ref()),
        income_tax_percentage: coerce(input.income_tax_percentage.as_ref()),
        other_deductions_fixed: coerce(input.other_deductions_fixed.as_ref()),
        ..PayrollRecord::default()
    };

    record.house_rent_amount = basic_salary * record.house_rent_allowance_percentage / 100.0;
    record.medical_amount = basic_salary * record.medical_allowance_percentage / 100.0;

    record.gross_salary = basic_salary
        + record.house_rent_amount
        + record.medical_amount
        + record.conveyance_allowance_fixed
        + record.telephone_allowance_fixed
        + record.special_allowance_fixed
        + record.other_allowances_fixed;

    record.income_tax_amount = record.gross_salary * record.income_tax_percentage / 100.0;
    record.total_deductions = record.income_tax_amount + record.other_deductions_fixed;
    record.net_salary = record.gross_salary - record.total_deductions;

    for (key, value) in record.numeric_fields_mut() {
        if !is_unrounded_numeric_key(key) {
            *value = round_currency(*value);
        }
    }

    record
}
