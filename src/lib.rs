//! Fetch a single URL, time the exchange and read the leaf TLS certificate.
//!
//! ```no_run
//! use pagefetch::{PageFetcher, Report};
//!
//! let fetcher = PageFetcher::new()?;
//! let result = fetcher.fetch("https://example.com/")?;
//! println!("{}", Report::new("https://example.com/", &result));
//! # Ok::<(), pagefetch::FetchError>(())
//! ```

use log::{debug, info};
use reqwest::blocking::Client;
use reqwest::tls::TlsInfo;
use std::io::{self, BufRead};
use std::time::{Duration, Instant};
use url::Url;

pub mod certificate;
pub mod config;
mod error;
mod report;

pub use error::FetchError;
pub use report::Report;

/// Outcome of one successful exchange.
///
/// Certificate fields are filled independently; any of them stays `None`
/// when its own extraction step failed.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchResult {
    pub elapsed_seconds: f64,
    pub cert_issuer: Option<String>,
    pub cert_not_before: Option<String>,
    pub cert_not_after: Option<String>,
}

impl FetchResult {
    fn new(elapsed_seconds: f64) -> Self {
        FetchResult {
            elapsed_seconds,
            cert_issuer: None,
            cert_not_before: None,
            cert_not_after: None,
        }
    }

    /// Fills the certificate fields from the leaf certificate's DER bytes.
    fn read_certificate(&mut self, der: &[u8]) {
        let cert = match certificate::decode(der) {
            Ok(cert) => cert,
            Err(err) => {
                debug!("{}", err);
                return;
            }
        };
        self.cert_issuer = certificate::issuer_line(&cert)
            .map_err(|err| debug!("issuer: {}", err))
            .ok();
        self.cert_not_before = certificate::not_before(&cert)
            .map_err(|err| debug!("not before: {}", err))
            .ok();
        self.cert_not_after = certificate::not_after(&cert)
            .map_err(|err| debug!("not after: {}", err))
            .ok();
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchOptions {
    /// Total request timeout; `None` keeps the client default
    pub timeout: Option<Duration>,
    pub user_agent: Option<String>,
    /// Honour `HTTP_PROXY`/`HTTPS_PROXY`/`NO_PROXY`
    pub system_proxy: bool,
}

impl Default for FetchOptions {
    fn default() -> Self {
        FetchOptions {
            timeout: None,
            user_agent: None,
            system_proxy: true,
        }
    }
}

/// Blocking page fetcher with mandatory certificate and hostname verification.
pub struct PageFetcher {
    client: Client,
}

impl PageFetcher {
    pub fn new() -> Result<PageFetcher, FetchError> {
        PageFetcher::with_options(&FetchOptions::default())
    }

    pub fn with_options(options: &FetchOptions) -> Result<PageFetcher, FetchError> {
        let mut builder = Client::builder()
            .danger_accept_invalid_certs(false)
            .tls_info(true);
        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(agent) = &options.user_agent {
            builder = builder.user_agent(agent.as_str());
        }
        if !options.system_proxy {
            builder = builder.no_proxy();
        }

        let client = builder.build().map_err(|e| FetchError::ClientInit {
            details: error::describe(&e),
        })?;
        Ok(PageFetcher { client })
    }

    /// Performs one GET, discarding the body, and collects timing and
    /// certificate metadata.
    ///
    /// Transport and verification failures are returned as
    /// `FetchError::Request`. A missing or undecodable certificate is not an
    /// error; the matching fields are simply left empty.
    pub fn fetch(&self, url: &str) -> Result<FetchResult, FetchError> {
        let target = Url::parse(url).map_err(|e| FetchError::Request {
            url: url.to_string(),
            details: format!("invalid URL: {}", e),
        })?;

        info!("fetching {}", target);
        let start = Instant::now();
        let mut response = self
            .client
            .get(target)
            .send()
            .map_err(|e| FetchError::request(url, &e))?;
        let peer_certificate = response
            .extensions()
            .get::<TlsInfo>()
            .and_then(|tls| tls.peer_certificate())
            .map(<[u8]>::to_vec);
        let status = response.status();
        let body_len = response
            .copy_to(&mut io::sink())
            .map_err(|e| FetchError::request(url, &e))?;
        let elapsed = start.elapsed().as_secs_f64();
        info!(
            "{} answered {} with {} bytes in {:.3}s",
            url, status, body_len, elapsed
        );

        let mut result = FetchResult::new(elapsed);
        match peer_certificate {
            Some(der) => result.read_certificate(&der),
            None => debug!("{}", FetchError::CertificateUnavailable),
        }
        Ok(result)
    }
}

/// Reads the URL from one line of input: its first whitespace-delimited token.
pub fn read_url<R: BufRead>(mut reader: R) -> Result<String, FetchError> {
    let mut line = String::new();
    reader.read_line(&mut line)?;
    line.split_whitespace()
        .next()
        .map(String::from)
        .ok_or_else(|| FetchError::InvalidInput {
            field: "url".to_string(),
            reason: "cannot be empty".to_string(),
        })
}
