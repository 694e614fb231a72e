#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod report;
pub mod services;
pub mod summary;
pub mod types;

use config::Config;
use error::AppError;
use report::PeriodReport;
use services::stripe::StripeClient;
use tracing::info;

/// Runs the full report pipeline: fetch, classify, aggregate, print.
///
/// # Errors
/// Returns an error if the provider cannot be reached or responds with a
/// non-success status or a malformed body. Nothing is printed on failure;
/// partial progress is discarded.
pub async fn run(config: &Config) -> Result<(), AppError> {
    let client = StripeClient::new(config.api_token.clone())?;

    let invoices = client.fetch_invoices_since(config.period_since).await?;
    info!(fetched = invoices.len(), "invoice fetch complete");

    let report = PeriodReport::build(config.period_since, &invoices);
    print!("{}", report.render());

    Ok(())
}
