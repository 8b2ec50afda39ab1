//! Ready-made screen configurations.
//!
//! Each function returns a [`GridConfig`]; callers still choose initial
//! values, settings and callbacks when building the [`crate::DataGrid`].

use entrygrid_engine::formula::{ColumnRef, Formula};
use entrygrid_engine::layout::{ColumnGroup, RowGroup};
use entrygrid_engine::rules::{CalculatedColumn, ColumnSelector, PeriodHighlight};
use entrygrid_engine::GridConfig;

pub const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

pub const COMPANIES: [&str; 8] = [
    "Grifols",
    "CSL Behring",
    "Octapharma",
    "Takeda",
    "Baxalta",
    "Kedrion",
    "LFB",
    "Bio Products Laboratory",
];

/// Sample product hierarchy.
pub fn product_groups() -> Vec<RowGroup> {
    vec![
        RowGroup::new("Grup1", ["Prod 1.1", "Prod 1.2"]),
        RowGroup::new("Grup2", ["Prod 2.1", "Prod 2.2", "Prod 2.3"]),
        RowGroup::new("Grup3", ["Prod 3.1", "Prod 3.2"]),
    ]
}

const SALES_SUB: [&str; 3] = ["Vol.", "Price", "Turnover"];
const PATIENTS_SUB: [&str; 3] = ["Patients", "Dose", "Vol."];

fn per_month(months: &[&str], sub: [&str; 3]) -> Vec<ColumnGroup> {
    months.iter().map(|month| ColumnGroup::new(*month, sub)).collect()
}

/// Third column of every month = first × second of the same month.
fn monthly_product() -> CalculatedColumn {
    CalculatedColumn::new(
        ColumnSelector::every(3, 2),
        Formula::product(ColumnRef::Offset(-2), ColumnRef::Offset(-1)),
    )
}

/// Sales by product and month: Vol., Price, Turnover (= Vol. × Price).
/// Vol. is highlighted when it at least doubles month over month.
pub fn sales(months: &[&str], groups: Vec<RowGroup>) -> GridConfig {
    GridConfig::grouped(groups, per_month(months, SALES_SUB))
        .with_calculated(monthly_product())
        .with_highlight(PeriodHighlight::new(0))
}

/// Patients by product and month: Patients, Dose, Vol. (= Patients × Dose).
pub fn patients(months: &[&str], groups: Vec<RowGroup>) -> GridConfig {
    GridConfig::grouped(groups, per_month(months, PATIENTS_SUB)).with_calculated(monthly_product())
}

/// Market per company: Units, ASP, Sales (= Units × ASP) and Share (Sales
/// as a percentage of all companies' Sales).
pub fn market(companies: &[&str]) -> GridConfig {
    GridConfig::flat(companies.len(), 4)
        .with_col_headers(["Units", "ASP", "Sales", "Share"])
        .with_row_headers(companies.iter().copied())
        .with_calculated(CalculatedColumn::new(
            2,
            Formula::product(ColumnRef::Absolute(0), ColumnRef::Absolute(1)),
        ))
        .with_calculated(CalculatedColumn::new(
            3,
            Formula::share_of_total(ColumnRef::Absolute(0), ColumnRef::Absolute(1)),
        ))
}

/// Plain 10 × 5 sheet.
pub fn scratch() -> GridConfig {
    GridConfig::flat(10, 5)
        .with_col_headers(["A", "B", "C", "D", "E"])
        .with_row_headers((1..=10).map(|i| i.to_string()))
}
