//! Pingdom CLI: query checks, probes, results, and summaries from the terminal.

mod output;

use clap::{ArgAction, Args, Parser, Subcommand};
use pingdom_lib::{get_credentials, resolve_window, Client, Resolution, ResultsOptions, TimeRange};
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "pingdom")]
#[command(about = "Pingdom CLI: query checks, probes, results, and summaries", long_about = None)]
struct Cli {
    /// Output format: plain (human-readable), json (structured).
    #[arg(short, long, default_value = "plain", global = true)]
    output: output::OutputFormat,

    /// Show timestamps in UTC only. By default timestamps are shown in local timezone.
    #[arg(long, global = true)]
    utc: bool,

    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// API root to talk to instead of the public Pingdom endpoint.
    #[arg(long, env = "PINGDOM_API_BASE", hide = true)]
    api_base: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Time window shared by the results and summary commands.
#[derive(Args)]
struct Window {
    /// Start of the window (UNIX seconds or ISO 8601)
    #[arg(long)]
    from: Option<String>,
    /// End of the window (UNIX seconds or ISO 8601, default now)
    #[arg(long)]
    to: Option<String>,
    /// Window length ending at --to, e.g. 30min, 6hours, 7days, 2weeks (default 1day)
    #[arg(long, conflicts_with = "from")]
    range: Option<String>,
}

impl Window {
    fn resolve(&self) -> Result<TimeRange, String> {
        resolve_window(
            self.from.as_deref(),
            self.to.as_deref(),
            self.range.as_deref(),
        )
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List checks
    Checks,
    /// List probe servers
    Probes,
    /// List raw test results for a check
    Results {
        check_id: u64,
        /// Number of results to return
        #[arg(long, default_value_t = pingdom_lib::DEFAULT_RESULTS_LIMIT)]
        limit: u32,
        /// Only results from these probe ids (comma-separated)
        #[arg(long, value_delimiter = ',')]
        probes: Option<Vec<String>>,
        /// Number of results to skip
        #[arg(long, default_value_t = 0)]
        offset: u32,
        #[command(flatten)]
        window: Window,
    },
    /// List status changes (up/down) for a check
    Outages {
        check_id: u64,
        #[command(flatten)]
        window: Window,
    },
    /// Show total up/down/unknown time for a check
    Uptime {
        check_id: u64,
        #[command(flatten)]
        window: Window,
    },
    /// Show average response time and uptime per interval
    Performance {
        check_id: u64,
        /// Bucket size: hour, day or week
        #[arg(long, default_value = "hour")]
        resolution: Resolution,
        #[command(flatten)]
        window: Window,
    },
    /// Show version
    Version,
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "error",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if matches!(cli.command, Commands::Version) {
        println!("pingdom {}", env!("CARGO_PKG_VERSION"));
        return ExitCode::SUCCESS;
    }

    let (credentials, source) = match get_credentials() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    tracing::debug!(?source, "credentials resolved");

    let mut client = Client::from_credentials(credentials);
    if let Some(base) = cli.api_base {
        client = client.with_base_url(base);
    }
    match run(&client, cli.command, cli.output, cli.utc).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(
    client: &Client,
    cmd: Commands,
    format: output::OutputFormat,
    use_utc: bool,
) -> Result<(), String> {
    let print_value = |v: serde_json::Value| -> Result<(), String> {
        match format {
            output::OutputFormat::Plain => print!("{}", output::format_plain(&v, use_utc)),
            output::OutputFormat::Json => {
                println!("{}", output::format_json(&v).map_err(|e| e.to_string())?)
            }
        }
        Ok(())
    };
    match cmd {
        Commands::Checks => {
            let checks = client.list_checks().await.map_err(|e| e.to_string())?;
            print_value(serde_json::Value::Array(checks))?;
        }
        Commands::Probes => {
            let probes = client.list_probes().await.map_err(|e| e.to_string())?;
            print_value(serde_json::to_value(&probes).map_err(|e| e.to_string())?)?;
        }
        Commands::Results {
            check_id,
            limit,
            probes,
            offset,
            window,
        } => {
            let options = ResultsOptions { limit, probes };
            let results = client
                .get_results(check_id, window.resolve()?, offset, &options)
                .await
                .map_err(|e| e.to_string())?;
            print_value(serde_json::Value::Array(results))?;
        }
        Commands::Outages { check_id, window } => {
            let states = client
                .get_outage_results(check_id, window.resolve()?)
                .await
                .map_err(|e| e.to_string())?;
            print_value(serde_json::Value::Array(states))?;
        }
        Commands::Uptime { check_id, window } => {
            let status = client
                .get_total_uptime(check_id, window.resolve()?)
                .await
                .map_err(|e| e.to_string())?;
            print_value(status)?;
        }
        Commands::Performance {
            check_id,
            resolution,
            window,
        } => {
            let buckets = client
                .get_performance_summary(check_id, window.resolve()?, resolution)
                .await
                .map_err(|e| e.to_string())?;
            print_value(serde_json::Value::Array(buckets))?;
        }
        Commands::Version => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn results_args_parse_probe_list_and_defaults() {
        let cli = Cli::parse_from([
            "pingdom", "results", "42", "--probes", "1,2", "--from", "1000", "--to", "2000",
        ]);
        match cli.command {
            Commands::Results {
                check_id,
                limit,
                probes,
                offset,
                window,
            } => {
                assert_eq!(check_id, 42);
                assert_eq!(limit, 100);
                assert_eq!(offset, 0);
                assert_eq!(probes, Some(vec!["1".to_string(), "2".to_string()]));
                assert_eq!(window.resolve().unwrap(), TimeRange::new(1000, 2000));
            }
            _ => panic!("expected results command"),
        }
    }

    #[test]
    fn performance_resolution_and_global_flags() {
        let cli = Cli::parse_from([
            "pingdom",
            "performance",
            "7",
            "--resolution",
            "day",
            "--range",
            "7days",
            "-o",
            "json",
            "-vv",
        ]);
        assert_eq!(cli.output, output::OutputFormat::Json);
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Performance {
                resolution, window, ..
            } => {
                assert_eq!(resolution, Resolution::Day);
                let w = window.resolve().unwrap();
                assert_eq!(w.to - w.from, 7 * 86400);
            }
            _ => panic!("expected performance command"),
        }
    }

    #[test]
    fn range_conflicts_with_from() {
        assert!(Cli::try_parse_from([
            "pingdom", "uptime", "1", "--from", "1000", "--range", "1day",
        ])
        .is_err());
    }

    #[test]
    fn output_and_resolution_accept_short_aliases() {
        let cli = Cli::parse_from([
            "pingdom", "-o", "text", "performance", "7", "--resolution", "weeks",
        ]);
        assert_eq!(cli.output, output::OutputFormat::Plain);
        match cli.command {
            Commands::Performance { resolution, .. } => assert_eq!(resolution, Resolution::Week),
            _ => panic!("expected performance command"),
        }
        assert!(Cli::try_parse_from(["pingdom", "-o", "xml", "checks"]).is_err());
        assert!(Cli::try_parse_from(["pingdom", "performance", "7", "--resolution", "month"]).is_err());
    }
}
