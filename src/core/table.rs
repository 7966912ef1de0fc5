//! Table helpers: payroll enrichment, search, pagination and column
//! resolution. Everything here is pure and works on already loaded records.

use crate::core::{
    records::{Employee, Payroll, SchemaRecord},
    schema::{self, FieldDefinition, RecordKind},
};
use std::collections::HashMap;

/// Shown in place of a full name when no employee owns a payroll.
pub const MISSING_NAME: &str = "N/A";

/// A payroll record joined with its employee's full name.
#[derive(Debug, Clone, PartialEq)]
pub struct PayrollRow {
    pub payroll: Payroll,
    pub employee_full_name: String,
}

impl SchemaRecord for PayrollRow {
    const KIND: RecordKind = RecordKind::Payroll;

    fn field_text(&self, key: &str) -> Option<String> {
        if key == schema::EMPLOYEE_FULL_NAME {
            return Some(self.employee_full_name.clone());
        }
        self.payroll.field_text(key)
    }
}

/// Attaches each payroll's employee full name, or [`MISSING_NAME`].
#[must_use]
pub fn enrich_payrolls(payrolls: Vec<Payroll>, employees: &[Employee]) -> Vec<PayrollRow> {
    let names: HashMap<&str, &str> = employees
        .iter()
        .map(|e| (e.employee_id.as_str(), e.full_name.as_str()))
        .collect();

    payrolls
        .into_iter()
        .map(|payroll| {
            let employee_full_name = names
                .get(payroll.record.employee_id.as_str())
                .copied()
                .unwrap_or(MISSING_NAME)
                .to_string();
            PayrollRow {
                payroll,
                employee_full_name,
            }
        })
        .collect()
}

/// Records where any schema field's text contains `term`, ignoring case.
/// A blank term matches everything.
#[must_use]
pub fn search<'a, R: SchemaRecord>(records: &'a [R], term: &str) -> Vec<&'a R> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return records.iter().collect();
    }

    records
        .iter()
        .filter(|record| {
            R::KIND.schema().iter().any(|field| {
                record
                    .field_text(field.key)
                    .is_some_and(|text| text.to_lowercase().contains(&needle))
            })
        })
        .collect()
}

/// One page of a list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based, clamped to `1..=total_pages`
    pub page: usize,
    /// At least 1, even for an empty list
    pub total_pages: usize,
    pub total_items: usize,
}

/// Slices `items` into page `page` (1-based) of `rows_per_page` rows.
/// Out-of-range pages are clamped; a zero page size is treated as 1.
#[must_use]
pub fn paginate<T: Clone>(items: &[T], page: usize, rows_per_page: usize) -> Page<T> {
    let rows_per_page = rows_per_page.max(1);
    let total_pages = items.len().div_ceil(rows_per_page).max(1);
    let page = page.clamp(1, total_pages);
    let start = (page - 1) * rows_per_page;

    Page {
        items: items.iter().skip(start).take(rows_per_page).cloned().collect(),
        page,
        total_pages,
        total_items: items.len(),
    }
}

/// Resolves visible keys to field definitions in display order.
///
/// Employee columns follow schema order. Payroll columns follow the order of
/// `keys`, with `employeeId` first. Unknown and hidden keys are skipped.
#[must_use]
pub fn display_columns(kind: RecordKind, keys: &[String]) -> Vec<&'static FieldDefinition> {
    let schema = kind.schema();
    match kind {
        RecordKind::Employee => schema
            .iter()
            .filter(|field| !field.is_hidden && keys.iter().any(|k| k == field.key))
            .collect(),
        RecordKind::Payroll => {
            let mut columns: Vec<&'static FieldDefinition> = Vec::with_capacity(keys.len());
            for field in keys.iter().filter_map(|key| schema::find_field(schema, key)) {
                if !field.is_hidden && !columns.iter().any(|c| c.key == field.key) {
                    columns.push(field);
                }
            }
            if let Some(index) = columns.iter().position(|c| c.key == schema::EMPLOYEE_ID) {
                let id_column = columns.remove(index);
                columns.insert(0, id_column);
            }
            columns
        }
    }
}
