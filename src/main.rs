use clap::{ArgAction, Parser};
use log::LevelFilter;
use pagefetch::config::Config;
use pagefetch::{read_url, FetchError, PageFetcher, Report};
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use std::process::exit;

/// Fetch a URL, time the request and show the server's TLS certificate issuer and validity
#[derive(Parser, Debug)]
#[command(name = "pagefetch", version, author, about, long_about = None)]
struct Args {
    /// URL to fetch; read from standard input when omitted
    url: Option<String>,

    /// TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(short, long, value_name = "SECS")]
    timeout: Option<u64>,

    /// User-Agent header to send
    #[arg(long, value_name = "UA")]
    user_agent: Option<String>,

    /// Ignore proxy settings from the environment
    #[arg(long)]
    no_proxy: bool,

    /// Print an example configuration file and exit
    #[arg(long)]
    generate_config: bool,

    /// Increase log verbosity (-v, -vv, -vvv, -vvvv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    if args.generate_config {
        print!("{}", Config::example_toml());
        exit(0);
    }

    let mut config = Config::default();
    if let Some(path) = &args.config {
        match Config::from_file(path) {
            Ok(file_config) => config = config.merge_with(file_config),
            Err(e) => {
                eprintln!("Failed to load config {}: {}", path.display(), e);
                exit(1);
            }
        }
    }
    let config = config.merge_with(Config::from_cli_args(
        args.url,
        args.timeout,
        args.user_agent,
        args.no_proxy,
    ));
    if let Err(e) = config.validate() {
        eprintln!("{}", e);
        exit(1);
    }

    let fetcher = match PageFetcher::with_options(&config.fetch_options()) {
        Ok(fetcher) => fetcher,
        Err(e) => fail(&e),
    };

    let url = match config.url {
        Some(url) => url,
        None => match prompt_url() {
            Ok(url) => url,
            Err(e) => fail(&e),
        },
    };

    match fetcher.fetch(&url) {
        Ok(result) => println!("{}", Report::new(&url, &result)),
        Err(e) => fail(&e),
    }
}

/// Prints the one-line diagnostic and ends the process.
fn fail(e: &FetchError) -> ! {
    eprintln!("{}", e);
    exit(exit_code(e));
}

fn exit_code(e: &FetchError) -> i32 {
    if e.is_fatal() {
        1
    } else {
        0
    }
}

fn prompt_url() -> Result<String, FetchError> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        print!("Enter URL: ");
        io::stdout().flush()?;
    }
    read_url(stdin.lock())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Error,
        1 => LevelFilter::Warn,
        2 => LevelFilter::Info,
        3 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    let mut builder = env_logger::Builder::new();
    builder.filter_level(level).format_timestamp_micros();
    if verbose == 0 {
        builder.parse_default_env();
    }
    builder.init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_cli_parsing() {
        let args = Args::try_parse_from([
            "pagefetch",
            "https://example.com/",
            "-t",
            "5",
            "--no-proxy",
            "-vv",
        ])
        .unwrap();
        assert_eq!(args.url.as_deref(), Some("https://example.com/"));
        assert_eq!(args.timeout, Some(5));
        assert!(args.no_proxy);
        assert_eq!(args.verbose, 2);
        assert!(args.config.is_none());
    }

    #[test]
    fn test_exit_code() {
        let request = FetchError::Request {
            url: "https://nowhere.invalid/".to_string(),
            details: "dns error".to_string(),
        };
        assert_eq!(exit_code(&request), 1);
        assert_eq!(exit_code(&FetchError::CertificateUnavailable), 0);
    }

    #[test]
    fn test_cli_url_is_optional() {
        let args = Args::try_parse_from(["pagefetch"]).unwrap();
        assert!(args.url.is_none());
        assert!(!args.generate_config);
    }
}
