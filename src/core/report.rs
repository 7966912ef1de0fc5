//! Report generation business logic.
//!
//! Roster statistics, per-payroll earnings/deductions breakdowns and the
//! currency formatting used to present them. Everything except
//! [`generate_roster_summary`] is pure and works on already loaded records.

use crate::{
    core::{
        payroll::round_currency,
        record_store::RecordStore,
        records::{Employee, EmployeeStatus, PayrollRecord},
        schema::{self, ValueType},
        store::KeyValueStore,
    },
    errors::Result,
};
use std::collections::HashSet;
use tracing::instrument;

/// Percentage inputs and the calculated amounts they produce.
const PERCENTAGE_AMOUNTS: [(&str, &str); 3] = [
    ("houseRentAllowancePercentage", "houseRentAmount"),
    ("medicalAllowancePercentage", "medicalAmount"),
    ("incomeTaxPercentage", "incomeTaxAmount"),
];

/// Head counts by employment status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmployeeStats {
    pub total: usize,
    pub active: usize,
    pub on_leave: usize,
    pub terminated: usize,
}

/// Counts employees by status.
#[must_use]
pub fn employee_stats(employees: &[Employee]) -> EmployeeStats {
    employees
        .iter()
        .fold(EmployeeStats::default(), |mut stats, employee| {
            stats.total += 1;
            match employee.status {
                EmployeeStatus::Active => stats.active += 1,
                EmployeeStatus::OnLeave => stats.on_leave += 1,
                EmployeeStatus::Terminated => stats.terminated += 1,
            }
            stats
        })
}

/// One labelled line of a payroll breakdown.
#[derive(Debug, Clone, PartialEq)]
pub struct BreakdownItem {
    /// Schema key of the input field
    pub key: &'static str,
    /// Schema label of the input field
    pub label: &'static str,
    /// Rate for percentage-based lines
    pub percentage: Option<f64>,
    /// Money amount of the line
    pub amount: f64,
}

/// Earnings and deductions of one payroll record.
#[derive(Debug, Clone, PartialEq)]
pub struct PayrollBreakdown {
    pub earnings: Vec<BreakdownItem>,
    pub deductions: Vec<BreakdownItem>,
    pub gross_salary: f64,
    pub total_deductions: f64,
    pub net_salary: f64,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum LineKind {
    Earning,
    Deduction,
}

fn line_kind(key: &str) -> Option<LineKind> {
    let key_lower = key.to_ascii_lowercase();
    if key == schema::BASIC_SALARY || key_lower.contains("allowance") {
        Some(LineKind::Earning)
    } else if key_lower.contains("tax") || key_lower.contains("deduction") {
        Some(LineKind::Deduction)
    } else {
        None
    }
}

/// Splits a payroll record into labelled earnings and deductions.
///
/// Lines come from the numeric input fields of the payroll schema, in schema
/// order. Percentage inputs are paired with the amount they produce. Lines
/// whose amount and rate are both zero are left out.
///
/// # Arguments
/// * `record` - A computed payroll record
///
/// # Returns
/// The breakdown plus the gross / deductions / net summary figures
#[must_use]
pub fn payroll_breakdown(record: &PayrollRecord) -> PayrollBreakdown {
    let mut breakdown = PayrollBreakdown {
        earnings: Vec::new(),
        deductions: Vec::new(),
        gross_salary: record.gross_salary,
        total_deductions: record.total_deductions,
        net_salary: record.net_salary,
    };

    let inputs = schema::payroll_schema()
        .iter()
        .filter(|field| field.is_user_input() && field.value_type == ValueType::Number);

    for field in inputs {
        let Some(kind) = line_kind(field.key) else {
            continue;
        };

        let (percentage, amount) = match PERCENTAGE_AMOUNTS.iter().find(|(pct, _)| *pct == field.key)
        {
            Some((pct_key, amount_key)) => (record.number(pct_key), record.number(amount_key)),
            None => (None, record.number(field.key)),
        };
        let amount = amount.unwrap_or_default();
        if amount == 0.0 && percentage.is_none_or(|p| p == 0.0) {
            continue;
        }

        let item = BreakdownItem {
            key: field.key,
            label: field.label,
            percentage,
            amount,
        };
        match kind {
            LineKind::Earning => breakdown.earnings.push(item),
            LineKind::Deduction => breakdown.deductions.push(item),
        }
    }

    breakdown
}

/// Formats an amount as US dollars with thousands separators.
///
/// # Returns
/// Formatted string like "$1,234.50" or "-$25.00"; non-finite amounts show as "$0.00"
#[must_use]
pub fn format_currency(amount: f64) -> String {
    let amount = round_currency(amount);
    let sign = if amount < 0.0 { "-" } else { "" };
    let fixed = format!("{:.2}", amount.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    format!("{sign}${grouped}.{cents}")
}

/// Snapshot of the stored roster and payroll.
#[derive(Debug, Clone, PartialEq)]
pub struct RosterSummary {
    pub stats: EmployeeStats,
    pub payroll_count: usize,
    /// Payrolls whose employee no longer exists
    pub orphaned_payrolls: usize,
    pub total_gross_salary: f64,
    pub total_net_salary: f64,
}

/// Loads both collections and summarizes them.
#[instrument(skip(store))]
pub async fn generate_roster_summary<S: KeyValueStore>(store: &RecordStore<S>) -> Result<RosterSummary> {
    let employees = store.list_employees().await?;
    let payrolls = store.list_payrolls().await?;

    let known: HashSet<&str> = employees.iter().map(|e| e.employee_id.as_str()).collect();
    let orphaned_payrolls = payrolls
        .iter()
        .filter(|p| !known.contains(p.record.employee_id.as_str()))
        .count();

    Ok(RosterSummary {
        stats: employee_stats(&employees),
        payroll_count: payrolls.len(),
        orphaned_payrolls,
        total_gross_salary: round_currency(payrolls.iter().map(|p| p.record.gross_salary).sum()),
        total_net_salary: round_currency(payrolls.iter().map(|p| p.record.net_salary).sum()),
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::core::{payroll::compute_metrics, records::PayrollInput};
    use crate::test_utils::*;

    fn sample_record() -> PayrollRecord {
        compute_metrics(&PayrollInput {
            basic_salary: Some(5000.0.into()),
            house_rent_allowance_percentage: Some(40.0.into()),
            medical_allowance_percentage: Some(10.0.into()),
            conveyance_allowance_fixed: Some(100.0.into()),
            telephone_allowance_fixed: Some(50.0.into()),
            income_tax_percentage: Some(10.0.into()),
            other_deductions_fixed: Some(20.0.into()),
            ..PayrollInput::new("E001")
        })
    }

    #[test]
    fn test_employee_stats() {
        let mut employees = vec![
            sample_employee("E001", "Ada Lovelace"),
            sample_employee("E002", "Alan Turing"),
            sample_employee("E003", "Grace Hopper"),
        ];
        employees[1].status = EmployeeStatus::OnLeave;
        employees[2].status = EmployeeStatus::Terminated;

        assert_eq!(
            employee_stats(&employees),
            EmployeeStats {
                total: 3,
                active: 1,
                on_leave: 1,
                terminated: 1,
            }
        );
        assert_eq!(employee_stats(&[]), EmployeeStats::default());
    }

    #[test]
    fn test_payroll_breakdown_earnings() {
        let breakdown = payroll_breakdown(&sample_record());

        let earnings: Vec<(&str, Option<f64>, f64)> = breakdown
            .earnings
            .iter()
            .map(|i| (i.key, i.percentage, i.amount))
            .collect();
        assert_eq!(
            earnings,
            vec![
                ("basicSalary", None, 5000.0),
                ("houseRentAllowancePercentage", Some(40.0), 2000.0),
                ("medicalAllowancePercentage", Some(10.0), 500.0),
                ("conveyanceAllowanceFixed", None, 100.0),
                ("telephoneAllowanceFixed", None, 50.0),
            ]
        );
        assert_eq!(breakdown.earnings[1].label, "HRA (%)");
    }

    #[test]
    fn test_payroll_breakdown_deductions_and_summary() {
        let breakdown = payroll_breakdown(&sample_record());

        let deductions: Vec<(&str, f64)> = breakdown
            .deductions
            .iter()
            .map(|i| (i.key, i.amount))
            .collect();
        assert_eq!(
            deductions,
            vec![("incomeTaxPercentage", 765.0), ("otherDeductionsFixed", 20.0)]
        );
        assert_eq!(breakdown.gross_salary, 7650.0);
        assert_eq!(breakdown.total_deductions, 785.0);
        assert_eq!(breakdown.net_salary, 6865.0);
    }

    #[test]
    fn test_payroll_breakdown_skips_zero_lines() {
        let record = compute_metrics(&PayrollInput {
            basic_salary: Some(1000.0.into()),
            ..PayrollInput::new("E001")
        });
        let breakdown = payroll_breakdown(&record);
        assert_eq!(breakdown.earnings.len(), 1);
        assert!(breakdown.deductions.is_empty());
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(0.0), "$0.00");
        assert_eq!(format_currency(6865.0), "$6,865.00");
        assert_eq!(format_currency(1_234_567.891), "$1,234,567.89");
        assert_eq!(format_currency(999.999), "$1,000.00");
        assert_eq!(format_currency(-25.5), "-$25.50");
        assert_eq!(format_currency(f64::NAN), "$0.00");
    }

    #[tokio::test]
    async fn test_generate_roster_summary() -> Result<()> {
        init_test_tracing();
        let store = memory_record_store();

        let ada = store.add_employee(complete_employee_input("E001", "Ada Lovelace")).await?;
        store.add_employee(complete_employee_input("E002", "Alan Turing")).await?;
        store.upsert_payroll(sample_payroll_input(&ada.employee_id)).await?;
        store.upsert_payroll(sample_payroll_input("E404")).await?;

        let summary = generate_roster_summary(&store).await?;
        assert_eq!(summary.stats.total, 2);
        assert_eq!(summary.stats.active, 2);
        assert_eq!(summary.payroll_count, 2);
        assert_eq!(summary.orphaned_payrolls, 1);
        assert_eq!(summary.total_gross_salary, 15300.0);
        assert_eq!(summary.total_net_salary, 13730.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_generate_roster_summary_empty_store() -> Result<()> {
        let summary = generate_roster_summary(&memory_record_store()).await?;
        assert_eq!(summary.stats, EmployeeStats::default());
        assert_eq!(summary.payroll_count, 0);
        assert_eq!(summary.total_net_salary, 0.0);
        Ok(())
    }
}
