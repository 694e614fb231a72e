use crate::error::AppError;
use std::env;

/// Stripe caps invoice search pages at 100 records per request.
pub const PAGE_LIMIT: u8 = 100;

/// Default reporting period lower bound: 2024-09-01 04:00:00 UTC.
const DEFAULT_PERIOD_SINCE: i64 = 1_725_163_200;

const TOKEN_VAR: &str = "STRIPE_TOKEN";
const PERIOD_VAR: &str = "PERIOD_SINCE";

#[derive(Debug, Clone)]
pub struct Config {
    /// Secret API key, injected into the provider client rather than read
    /// ambiently inside it.
    pub api_token: String,
    /// Unix epoch seconds; invoices created strictly after this instant
    /// are included in the report.
    pub period_since: i64,
}

impl Config {
    /// Loads the configuration from the process environment.
    ///
    /// # Errors
    /// Returns an error if `STRIPE_TOKEN` is missing or empty, or if
    /// `PERIOD_SINCE` is set but not a valid epoch-seconds integer.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_vars(env::var(TOKEN_VAR).ok(), env::var(PERIOD_VAR).ok())
    }

    fn from_vars(token: Option<String>, period: Option<String>) -> Result<Self, AppError> {
        let api_token = token
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| AppError::Config(format!("{TOKEN_VAR} is not set")))?;

        let period_since = match period {
            Some(raw) => raw.trim().parse().map_err(|_| {
                AppError::Config(format!(
                    "{PERIOD_VAR} must be Unix epoch seconds, got '{raw}'"
                ))
            })?,
            None => DEFAULT_PERIOD_SINCE,
        };

        Ok(Self {
            api_token,
            period_since,
        })
    }
}
