//! Roster CLI
//!
//! Command-line interface for bulk employee onboarding:
//! - Export upload templates
//! - Check a CSV/Excel file without submitting
//! - Submit a file to the employee API
//! - List employees recorded for a company

use anyhow::Context;
use clap::{Parser, Subcommand};
use roster::config::{generate_default_config, Config, LoggingConfig};
use roster::{
    BulkSession, BulkSubmitter, EmployeeApi, EmployeeRecord, EmployeeRepository, HttpEmployeeApi,
    JsonFileRepository, ParsedBatch, RowParser, SubmitError, TemplateFormat, ValidationErrors,
};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "roster")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Bulk employee onboarding from CSV and Excel files")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: <config_dir>/roster/config.toml or ./roster.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Print machine-readable JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write an upload template
    Template {
        /// Template format (csv, xlsx)
        #[arg(short, long, default_value = "csv")]
        format: TemplateFormat,
        /// Output file (default: employee_template.<ext>)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Parse and validate a file without submitting
    Check {
        /// Path to a .csv, .xlsx or .xls file
        file: PathBuf,
    },

    /// Parse, validate and submit a file
    Submit {
        /// Path to a .csv, .xlsx or .xls file
        file: PathBuf,
        /// Company the employees belong to
        #[arg(long)]
        company: String,
        /// Validate only (nothing is sent)
        #[arg(long)]
        dry_run: bool,
    },

    /// List employees for a company
    List {
        /// Company ID
        #[arg(long)]
        company: String,
        /// Ask the employee API instead of the local store
        #[arg(long)]
        remote: bool,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    init_logging(&config.logging);

    match cli.command {
        Commands::Template { format, output } => {
            let path = output.unwrap_or_else(|| PathBuf::from(format.file_name()));
            roster::import::write_template(format, &path)?;
            println!("Template written to {}", path.display());
        }

        Commands::Check { file } => {
            let batch = read_file(&config, &file)?;
            let mut session = BulkSession::from_batch(batch.clone());
            let valid = session.validate();

            if cli.json {
                print_json(&batch, session.errors())?;
            } else {
                print_summary(&batch, session.errors());
            }

            if !valid {
                std::process::exit(1);
            }
        }

        Commands::Submit {
            file,
            company,
            dry_run,
        } => {
            let batch = read_file(&config, &file)?;
            let mut session = BulkSession::from_batch(batch.clone());

            if !session.validate() {
                print_summary(&batch, session.errors());
                eprintln!();
                eprintln!("Please fix the validation errors before submitting.");
                std::process::exit(1);
            }

            if dry_run {
                println!("{} employees ready to submit.", session.len());
                println!("(Dry run - nothing was sent)");
                return Ok(());
            }

            let api = Arc::new(HttpEmployeeApi::new(config.api_client())?);
            let repository = Arc::new(JsonFileRepository::new(expand_home(
                &config.storage.data_dir,
            )));
            let submitter =
                BulkSubmitter::new(api, config.submit()).with_repository(repository);

            let result = submitter
                .submit_session(&mut session, &company, |percent| {
                    eprint!("\rSubmitting... {:>3}%", percent);
                    let _ = std::io::stderr().flush();
                })
                .await;
            eprintln!();

            match result {
                Ok(report) => {
                    println!("{}", report.message);
                    for failed in &report.result.failed {
                        println!(
                            "  {} <{}>: {}",
                            failed.record.full_name(),
                            failed.record.email,
                            failed.reason
                        );
                    }
                }
                Err(SubmitError::Invalid(errors)) => {
                    print_summary(&batch, &errors);
                    std::process::exit(1);
                }
                Err(e) => {
                    tracing::debug!(error = ?e, "Submission failed");
                    eprintln!("{}", e);
                    std::process::exit(1);
                }
            }
        }

        Commands::List { company, remote } => {
            let employees = if remote {
                let api = HttpEmployeeApi::new(config.api_client())?;
                api.list_employees(&company).await?
            } else {
                JsonFileRepository::new(expand_home(&config.storage.data_dir)).list(&company)?
            };

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&employees)?);
            } else {
                print_employees(&employees);
            }
        }

        Commands::Config { output } => {
            let content = generate_default_config();
            match output {
                Some(path) => {
                    std::fs::write(&path, &content)
                        .with_context(|| format!("writing {}", path.display()))?;
                    println!("Config written to {}", path.display());
                }
                None => print!("{}", content),
            }
        }
    }

    Ok(())
}

fn init_logging(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("roster={}", config.level)));
    let registry = tracing_subscriber::registry().with(filter);

    if config.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn read_file(config: &Config, path: &Path) -> anyhow::Result<ParsedBatch> {
    if !path.exists() {
        anyhow::bail!("File not found: {}", path.display());
    }
    RowParser::new()
        .with_strict_dates(config.import.strict_dates)
        .parse_path(path)
        .with_context(|| format!("reading {}", path.display()))
}

/// `~/...` paths from the config file
fn expand_home(path: &str) -> PathBuf {
    match path.strip_prefix("~/") {
        Some(rest) => dirs::home_dir()
            .map(|home| home.join(rest))
            .unwrap_or_else(|| PathBuf::from(path)),
        None => PathBuf::from(path),
    }
}

fn print_summary(batch: &ParsedBatch, errors: &ValidationErrors) {
    println!("Records: {}", batch.records.len());
    if !batch.skipped_rows.is_empty() {
        let rows: Vec<String> = batch.skipped_rows.iter().map(|r| r.to_string()).collect();
        println!("Skipped rows (missing name or email): {}", rows.join(", "));
    }

    if errors.is_empty() {
        println!("All records are valid.");
        return;
    }

    println!(
        "Invalid records: {} ({} field errors)",
        errors.len(),
        errors.field_count()
    );
    println!();
    println!("{:<6} {:<25} {:<12} {}", "Record", "Employee", "Field", "Error");
    println!("{}", "-".repeat(80));
    for (index, fields) in errors.iter() {
        let name = batch
            .records
            .get(index)
            .map(EmployeeRecord::full_name)
            .unwrap_or_default();
        for (field, message) in fields {
            println!(
                "{:<6} {:<25} {:<12} {}",
                index + 1,
                name,
                field.as_str(),
                message
            );
        }
    }
}

fn print_json(batch: &ParsedBatch, errors: &ValidationErrors) -> anyhow::Result<()> {
    let report = serde_json::json!({
        "records": batch.records,
        "skippedRows": batch.skipped_rows,
        "errors": errors,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn print_employees(employees: &[EmployeeRecord]) {
    if employees.is_empty() {
        println!("No employees recorded yet.");
        return;
    }

    println!(
        "{:<25} {:<30} {:<18} {}",
        "Name", "Email", "Department", "Position"
    );
    println!("{}", "-".repeat(90));
    for employee in employees {
        println!(
            "{:<25} {:<30} {:<18} {}",
            employee.full_name(),
            employee.email,
            employee.department,
            employee.position
        );
    }
}
