use serde::Deserialize;

/// Invoice status lifecycle as Stripe reports it under the pinned API
/// version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Draft,
    Open,
    Paid,
    Uncollectible,
    Void,
}

/// Line item collection. Only the count matters for classification, so
/// the items themselves stay opaque.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InvoiceLines {
    #[serde(default)]
    pub data: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Invoice {
    pub status: InvoiceStatus,
    /// Pre-credit total in the smallest currency unit (e.g., cents).
    pub total: i64,
    /// Amount actually paid in the smallest currency unit.
    pub amount_paid: i64,
    #[serde(default)]
    pub lines: InvoiceLines,
}

impl Invoice {
    #[must_use]
    pub fn is_paid(&self) -> bool {
        self.status == InvoiceStatus::Paid
    }

    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lines.data.len()
    }
}
