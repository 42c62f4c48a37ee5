//! Basic page fetch example.
//!
//! Fetches one URL with default client settings and prints the report
//! plus the raw fields of the result.
//!
//! Run with: cargo run --example basic_fetch -- https://github.com/

use pagefetch::{PageFetcher, Report};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let url = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "https://github.com/".to_string());

    let fetcher = PageFetcher::new()?;
    let result = fetcher.fetch(&url)?;

    println!("{}", Report::new(&url, &result));
    println!();
    println!("Elapsed (raw): {}", result.elapsed_seconds);
    println!("Issuer present: {}", result.cert_issuer.is_some());

    Ok(())
}
