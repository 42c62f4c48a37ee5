//! Text report printed after a successful fetch.

use std::fmt;

use chrono::Local;

use crate::FetchResult;

const UNKNOWN: &str = "Unknown";

/// A fetch result stamped with the time the report was generated.
pub struct Report<'a> {
    timestamp: String,
    url: &'a str,
    result: &'a FetchResult,
}

impl<'a> Report<'a> {
    /// Stamps the report with the current local time.
    pub fn new(url: &'a str, result: &'a FetchResult) -> Self {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        Self::with_timestamp(timestamp, url, result)
    }

    pub fn with_timestamp(timestamp: String, url: &'a str, result: &'a FetchResult) -> Self {
        Report {
            timestamp,
            url,
            result,
        }
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Timestamp: {}", self.timestamp)?;
        writeln!(f, "Page Load Time: {:.2} seconds", self.result.elapsed_seconds)?;
        writeln!(f, "URL: {}", self.url)?;
        writeln!(
            f,
            "SSL Certificate Issuer: {}",
            self.result.cert_issuer.as_deref().unwrap_or(UNKNOWN)
        )?;
        writeln!(
            f,
            "SSL Start Date: {}",
            self.result.cert_not_before.as_deref().unwrap_or(UNKNOWN)
        )?;
        write!(
            f,
            "SSL Expiry Date: {}",
            self.result.cert_not_after.as_deref().unwrap_or(UNKNOWN)
        )
    }
}
