//! Startup backfill configuration

use chrono::NaiveDate;
use serde::Deserialize;
use std::time::Duration;

use crate::application::handlers::MIN_PAGE_DELAY;
use crate::application::BackfillConfig as BackfillRunConfig;
use crate::domain::foundation::parse_report_date;

use super::error::ValidationError;

/// Backfill configuration
#[derive(Debug, Clone, Deserialize)]
pub struct BackfillConfig {
    /// Run a backfill when the service starts
    #[serde(default)]
    pub enabled: bool,

    /// Only list records created on or after this day (`YYYY-MM-DD`)
    #[serde(default)]
    pub from: Option<String>,

    #[serde(default = "default_page_delay_ms")]
    pub page_delay_ms: u64,
}

impl BackfillConfig {
    pub fn page_delay(&self) -> Duration {
        Duration::from_millis(self.page_delay_ms)
    }

    /// Parsed `from`, `None` when unset.
    pub fn from_date(&self) -> Result<Option<NaiveDate>, ValidationError> {
        match self.from.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            None => Ok(None),
            Some(raw) => parse_report_date("from", raw)
                .map(Some)
                .map_err(|_| ValidationError::InvalidBackfillFrom),
        }
    }

    pub fn run_config(&self) -> BackfillRunConfig {
        BackfillRunConfig::default().with_page_delay(self.page_delay())
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.page_delay() < MIN_PAGE_DELAY {
            return Err(ValidationError::PageDelayTooShort);
        }
        self.from_date()?;
        Ok(())
    }
}

impl Default for BackfillConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            from: None,
            page_delay_ms: default_page_delay_ms(),
        }
    }
}

fn default_page_delay_ms() -> u64 {
    100
}
