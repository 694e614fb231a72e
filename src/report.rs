use crate::summary::{
    base_invoices, paid_invoices, sum_amount_paid, sum_total, to_major_units, usage_invoices,
};
use crate::types::Invoice;
use chrono::DateTime;
use std::fmt::Write;

const SEPARATOR: &str = "-------------";

/// Fixed-order period report: fetch and partition counts plus rounded
/// major-unit totals for each partition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodReport {
    pub period_since: i64,
    pub fetched_count: usize,
    pub usage_count: usize,
    pub base_count: usize,
    pub paid_count: usize,
    /// Usage partition pre-credit total, rounded major units.
    pub usage_total: i64,
    /// Usage partition amount paid, rounded major units.
    pub usage_amount_paid: i64,
    pub base_amount_paid: i64,
    pub paid_amount_paid: i64,
}

impl PeriodReport {
    /// Classifies and aggregates the fetched set into the report figures.
    #[must_use]
    pub fn build(period_since: i64, invoices: &[Invoice]) -> Self {
        let usage = usage_invoices(invoices);
        let base = base_invoices(invoices);
        let paid = paid_invoices(invoices);

        Self {
            period_since,
            fetched_count: invoices.len(),
            usage_count: usage.len(),
            base_count: base.len(),
            paid_count: paid.len(),
            usage_total: to_major_units(sum_total(&usage)),
            usage_amount_paid: to_major_units(sum_amount_paid(&usage)),
            base_amount_paid: to_major_units(sum_amount_paid(&base)),
            paid_amount_paid: to_major_units(sum_amount_paid(&paid)),
        }
    }

    /// Renders the report block. Printing it is the caller's only side
    /// effect.
    #[must_use]
    pub fn render(&self) -> String {
        let period = format_period(self.period_since);
        let mut out = String::new();

        let _ = writeln!(out, "Totals for all invoices since {period}");
        let _ = writeln!(out, "{SEPARATOR}");
        let _ = writeln!(out, "Total fetched invoices: {}", self.fetched_count);
        let _ = writeln!(out, "{SEPARATOR}");
        let _ = writeln!(out, "Total usage invoices: {}", self.usage_count);
        let _ = writeln!(out, "Total base invoices: {}", self.base_count);
        let _ = writeln!(out, "Total paid invoices: {}", self.paid_count);
        let _ = writeln!(out, "{SEPARATOR}");
        let _ = writeln!(
            out,
            "Total usage amount before credit: {}",
            self.usage_total
        );
        let _ = writeln!(
            out,
            "Total usage amount after credit: {}",
            self.usage_amount_paid
        );
        let _ = writeln!(out, "Total base amount: {}", self.base_amount_paid);
        let _ = writeln!(out, "Total paid amount: {}", self.paid_amount_paid);

        out
    }
}

fn format_period(epoch_seconds: i64) -> String {
    DateTime::from_timestamp(epoch_seconds, 0).map_or_else(
        || format!("epoch {epoch_seconds}"),
        |dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
    )
}
