mod display;

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use chrono::Utc;
use clap::{Parser, Subcommand};
use futures::StreamExt;
use tracing::info;
use tracing_subscriber::EnvFilter;
use veilleur_core::colors::CatppuccinExt;
use veilleur_core::refresh::ProgressCallback;
use veilleur_core::{
    filter_domains, lint_sources, lint_table, list_source_files, parse_files, write_urls,
    DomainTable, Partition, ProbeClient, RefreshRunner, RefreshSummary, VeilleurError,
};

use display::progress::{
    clear_refresh_progress_bar, set_refresh_progress_bar, ProgressWriterFactory,
};

#[derive(Parser)]
#[command(name = "veilleur")]
#[command(about = "Watches the French public-sector domain name dataset - HTTP checks, status table, URL list")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format (human or json)
    #[arg(short, long, default_value = "human", global = true)]
    format: String,

    /// Increase log verbosity (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Probe the listed domains and update the status table and URL list
    Refresh {
        /// Source files listing domains (defaults to sources/*.txt)
        files: Vec<PathBuf>,
        /// Status table to update
        #[arg(long, default_value = "domains.csv")]
        output: PathBuf,
        /// URL list regenerated once the table is saved
        #[arg(long, default_value = "urls.txt")]
        urls: PathBuf,
        /// Probe fewer domains at once, in case servers complain
        #[arg(long)]
        slow: bool,
        /// Probe even fewer domains at once
        #[arg(long, conflicts_with = "slow")]
        slower: bool,
        /// Probe as gently as possible
        #[arg(long, conflicts_with_all = ["slow", "slower"])]
        slowest: bool,
        /// Probe at most this many domains
        #[arg(long)]
        limit: Option<usize>,
        /// Only probe domains whose name contains one of these substrings
        #[arg(long, num_args = 1..)]
        grep: Vec<String>,
        /// Probe one bucket, like "2/4"; "today/4" picks the bucket from the date
        #[arg(long)]
        partial: Option<String>,
        /// Hide the progress bar
        #[arg(short, long)]
        silent: bool,
    },
    /// Probe one domain over HTTPS and HTTP without touching the table
    Probe {
        /// Domain name to probe
        domain: String,
    },
    /// Show the recorded status of domains matching a pattern
    Get {
        /// Regular expression matched against domain names
        pattern: String,
        /// Status table to read
        #[arg(long, default_value = "domains.csv")]
        table: PathBuf,
    },
    /// Regenerate the URL list from the status table
    Urls {
        /// Status table to read
        #[arg(long, default_value = "domains.csv")]
        table: PathBuf,
        /// URL list to write
        #[arg(long, default_value = "urls.txt")]
        output: PathBuf,
    },
    /// Check source files and the status table for inconsistencies
    Lint {
        /// Source files to check (defaults to sources/*.txt)
        files: Vec<PathBuf>,
        /// Status table checked against the source files
        #[arg(long, default_value = "domains.csv")]
        table: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Log lines go through the progress writer so an active bar is not torn.
    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        _ => EnvFilter::new("debug"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(ProgressWriterFactory::new())
        .init();

    let output_format: veilleur_core::output::OutputFormat = cli.format.parse().unwrap_or_default();

    if let Err(e) = execute_command(cli.command, output_format, cli.verbose > 0).await {
        eprintln!("{} {}", "Error:".ctp_red(), e);
        std::process::exit(1);
    }
    Ok(())
}

async fn execute_command(
    command: Commands,
    output_format: veilleur_core::output::OutputFormat,
    verbose: bool,
) -> anyhow::Result<()> {
    let formatter = veilleur_core::output::get_formatter(output_format);

    match command {
        Commands::Refresh {
            files,
            output,
            urls,
            slow,
            slower,
            slowest,
            limit,
            grep,
            partial,
            silent,
        } => {
            let files = if files.is_empty() {
                list_source_files(Path::new("sources"))?
            } else {
                files
            };
            let entries = parse_files(&files)?;

            let mut table = DomainTable::load(&output)?;
            table.sync_with_sources(entries);

            let partition = resolve_partition(partial.as_deref())?;
            let names = filter_domains(table.iter(), &grep, partition, limit.unwrap_or(usize::MAX));
            info!(selected = names.len(), partition = %partition, "starting refresh");

            let kindness = if slowest {
                3
            } else if slower {
                2
            } else if slow {
                1
            } else {
                0
            };
            let runner = RefreshRunner::new(ProbeClient::new()?).with_kindness(kindness);

            let bar = (!silent && !verbose).then(|| display::refresh_progress_bar(names.len()));
            let progress: Option<ProgressCallback> = match &bar {
                Some(bar) => {
                    set_refresh_progress_bar(bar.clone());
                    let bar = bar.clone();
                    Some(Box::new(move |current, _total, domain: &str| {
                        bar.set_position(current as u64);
                        bar.set_message(domain.to_string());
                    }))
                }
                None => None,
            };

            let mut summary = RefreshSummary::default();
            {
                let stream = runner.run_stream(names, progress);
                tokio::pin!(stream);
                let ctrl_c = tokio::signal::ctrl_c();
                tokio::pin!(ctrl_c);
                loop {
                    tokio::select! {
                        report = stream.next() => match report {
                            Some(report) => {
                                table.apply(&report);
                                summary.record(&report);
                            }
                            None => break,
                        },
                        _ = &mut ctrl_c => {
                            info!("interrupted, saving the reports that completed");
                            summary.interrupted = true;
                            break;
                        }
                    }
                }
            }
            if let Some(bar) = &bar {
                bar.finish_and_clear();
            }
            clear_refresh_progress_bar();

            // Written even when the run was cut short, so an interrupted
            // night still lands its completed reports.
            table.write(&output)?;
            write_urls(&table, &urls)?;

            println!("{}", formatter.format_refresh(&summary));
        }
        Commands::Probe { domain } => {
            let client = ProbeClient::new()?;
            let spinner = display::probe_spinner(&format!("Probing {domain}..."));
            let report = client.probe_domain(&domain).await;
            spinner.finish_and_clear();
            println!("{}", formatter.format_probe(&report));
        }
        Commands::Get { pattern, table } => {
            let table = DomainTable::load(&table)?;
            let matches = table.search(&pattern)?;
            println!("{}", formatter.format_domains(&matches));
        }
        Commands::Urls { table, output } => {
            let table = DomainTable::load(&table)?;
            write_urls(&table, &output)?;
            let count = table.iter().filter(|d| d.url().is_some()).count();
            println!(
                "{} {} URLs written to {}",
                "✓".ctp_green(),
                count,
                output.display().to_string().teal()
            );
        }
        Commands::Lint { files, table } => {
            let files = if files.is_empty() {
                list_source_files(Path::new("sources"))?
            } else {
                files
            };
            let mut issues = lint_sources(&files)?;

            let entries = parse_files(&files)?;
            let names: HashSet<String> = entries.into_iter().map(|d| d.name).collect();
            let loaded = DomainTable::load(&table)?;
            issues.extend(lint_table(&loaded, &table, &names));

            println!("{}", formatter.format_lint(&issues));
            if !issues.is_empty() {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

/// `--partial` accepts `K/N` or `today/N`, the latter deriving the bucket
/// from today's date (UTC).
fn resolve_partition(arg: Option<&str>) -> veilleur_core::Result<Partition> {
    match arg {
        None => Ok(Partition::FULL),
        Some(raw) => match raw.split_once('/') {
            Some((day, of)) if day.trim() == "today" => {
                let of = of.trim().parse().map_err(|_| {
                    VeilleurError::InvalidPartition(format!(
                        "expected today/N with N >= 1, got {raw:?}"
                    ))
                })?;
                Partition::for_date(Utc::now().date_naive(), of)
            }
            _ => raw.parse(),
        },
    }
}
