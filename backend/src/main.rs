// tip-tracker: log shifts and see what each paycheck comes to

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use log::{debug, LevelFilter};

use shared::{
    CreateEntryRequest, Entry, PaycheckBreakdown, Settings, Theme, UpdateRatesRequest,
    WeekSummary, YtdFigures,
};
use tip_tracker_backend::domain::export_service::BACKUP_FILENAME;
use tip_tracker_backend::domain::pay_period::{day_name, format_date_for_display, to_iso};
use tip_tracker_backend::domain::MonthFilter;
use tip_tracker_backend::Backend;

#[derive(Parser)]
#[command(name = "tip-tracker")]
#[command(about = "Track shifts, tips and weekly paychecks")]
#[command(version)]
struct Cli {
    /// Data directory (defaults to the platform data dir)
    #[arg(long, global = true, env = "TIP_TRACKER_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log a shift
    #[command(after_help = "\
Examples:
  tip-tracker add Server 6.5 --tips 84.20 --cash-tips 40 --tip-outs 12
  tip-tracker add Bartender 8 --date 2025-01-08 --tips 150")]
    Add {
        /// Role worked (must exist in the role table)
        role: String,

        /// Hours worked
        hours: f64,

        /// Shift date, YYYY-MM-DD (defaults to today)
        #[arg(long, short = 'd')]
        date: Option<NaiveDate>,

        /// Credit card tips
        #[arg(long, default_value_t = 0.0)]
        tips: f64,

        #[arg(long, default_value_t = 0.0)]
        cash_tips: f64,

        /// Tips paid out to support staff
        #[arg(long, default_value_t = 0.0)]
        tip_outs: f64,
    },

    /// Delete a shift by id
    Remove { id: String },

    /// Weekly pay periods, newest first
    Weeks {
        /// Only weeks touching this month (YYYY-MM), or "all"
        #[arg(long, short = 'm', default_value = "all")]
        month: MonthFilter,
    },

    /// Months that have logged weeks
    Months,

    /// Year-to-date totals and weekly averages
    Ytd,

    /// Full paycheck breakdown for one shift
    Paycheck { id: String },

    /// Export every shift as a CSV report
    ExportCsv {
        /// Output file or directory (omit for stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Write a JSON backup of settings and shifts
    Backup {
        /// Output file or directory (omit for stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Replace all data with a JSON backup
    Restore { file: PathBuf },

    /// Capture rate snapshots for shifts saved without one
    Backfill,

    /// Show or change rates and preferences
    Settings {
        #[command(subcommand)]
        command: SettingsCommand,
    },

    /// Manage roles and their hourly rates
    Role {
        #[command(subcommand)]
        command: RoleCommand,
    },

    /// Delete all shifts and restore default settings
    Reset {
        /// Confirm the reset
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum SettingsCommand {
    Show,
    /// Change one or more rates (percentages, e.g. 5 for 5%)
    Set {
        #[arg(long)]
        tax_rate: Option<f64>,
        #[arg(long = "401k-rate")]
        k401_rate: Option<f64>,
        #[arg(long = "roth401k-rate")]
        roth401k_rate: Option<f64>,
        #[arg(long)]
        employer_match: Option<f64>,
        #[arg(long)]
        other_deductions: Option<f64>,
        /// light or dark
        #[arg(long)]
        theme: Option<Theme>,
    },
}

#[derive(Subcommand)]
enum RoleCommand {
    /// Add a role or change its hourly rate
    Set { name: String, rate: f64 },
    Remove { name: String },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// RUST_LOG wins unless --verbose is given; default level is info
fn init_logging(verbose: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if verbose {
        builder.filter_level(LevelFilter::Debug);
    }
    builder.init();
}

fn run(cli: Cli) -> Result<()> {
    let backend = Backend::open(cli.data_dir)?;

    match cli.command {
        Commands::Add { role, hours, date, tips, cash_tips, tip_outs } => {
            let date = date.unwrap_or_else(|| Local::now().date_naive());
            let entry = backend.entry_service.create_entry(CreateEntryRequest {
                date,
                role,
                hours,
                tips,
                cash_tips,
                tip_outs,
            })?;
            let paycheck = backend
                .paycheck(&entry.id)?
                .map(|(_, paycheck)| paycheck)
                .unwrap_or_default();
            println!(
                "Added {} {} on {} ({}): take-home {:.2}",
                entry.role,
                hours_label(entry.hours),
                format_date_for_display(entry.date),
                entry.id,
                paycheck.take_home
            );
        }

        Commands::Remove { id } => {
            if !backend.entry_service.delete_entry(&id)? {
                bail!("No shift with id {}", id);
            }
            println!("Removed {}", id);
        }

        Commands::Weeks { month } => {
            let weeks = backend.weeks(&month)?;
            if weeks.is_empty() {
                println!("No shifts logged for {}", month);
            }
            for week in &weeks {
                print_week(week);
            }
        }

        Commands::Months => {
            for month in backend.months()? {
                println!("{}", month);
            }
        }

        Commands::Ytd => {
            let ytd = backend.ytd()?;
            println!("Weeks: {}", ytd.total_weeks);
            println!("{:<10} {}", "", figures_header());
            println!("{:<10} {}", "Total", figures_row(&ytd.totals));
            println!("{:<10} {}", "Per week", figures_row(&ytd.averages));
        }

        Commands::Paycheck { id } => {
            let Some((entry, paycheck)) = backend.paycheck(&id)? else {
                bail!("No shift with id {}", id);
            };
            print_paycheck(&entry, &paycheck);
        }

        Commands::ExportCsv { output } => {
            let export = backend.export_csv()?;
            write_output(output, &export.filename, &export.csv_content)?;
            debug!("Exported {} shifts", export.entry_count);
        }

        Commands::Backup { output } => {
            let json = backend.export_backup()?;
            write_output(output, BACKUP_FILENAME, &json)?;
        }

        Commands::Restore { file } => {
            let json = fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let result = backend.restore_backup(&json)?;
            println!("Restored {} shifts", result.payload.entries.len());
            if result.dropped_entries > 0 {
                println!("Skipped {} malformed records", result.dropped_entries);
            }
        }

        Commands::Backfill => {
            let updated = backend.entry_service.backfill_snapshots()?;
            println!("Updated {} shifts", updated);
        }

        Commands::Settings { command } => match command {
            SettingsCommand::Show => print_settings(&backend.settings_service.get_settings()?),
            SettingsCommand::Set {
                tax_rate,
                k401_rate,
                roth401k_rate,
                employer_match,
                other_deductions,
                theme,
            } => {
                let mut settings = backend.settings_service.update_rates(UpdateRatesRequest {
                    tax_rate,
                    k401_rate,
                    roth401k_rate,
                    employer_match,
                    other_deductions,
                })?;
                if let Some(theme) = theme {
                    settings = backend.settings_service.set_theme(theme)?;
                }
                print_settings(&settings);
            }
        },

        Commands::Role { command } => match command {
            RoleCommand::Set { name, rate } => {
                let settings = backend.settings_service.upsert_role(&name, rate)?;
                print_roles(&settings.roles);
            }
            RoleCommand::Remove { name } => {
                if !backend.settings_service.remove_role(&name)? {
                    bail!("No role named {}", name);
                }
                println!("Removed role {}", name);
            }
        },

        Commands::Reset { yes } => {
            if !yes {
                bail!("This deletes every shift and resets settings; pass --yes to confirm");
            }
            backend.reset_all()?;
            println!("All data reset");
        }
    }

    Ok(())
}

/// Write to `output` (a file, or a directory that gets `filename`), or stdout
fn write_output(output: Option<PathBuf>, filename: &str, contents: &str) -> Result<()> {
    match output {
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(contents.as_bytes())?;
            if !contents.ends_with('\n') {
                writeln!(stdout)?;
            }
        }
        Some(path) => {
            let path = if path.is_dir() { path.join(filename) } else { path };
            fs::write(&path, contents)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Wrote {}", path.display());
        }
    }
    Ok(())
}

fn hours_label(hours: f64) -> String {
    format!("{}h", hours)
}

fn print_week(week: &WeekSummary) {
    println!(
        "{} - {}  (paid {})",
        format_date_for_display(week.week_start),
        format_date_for_display(week.week_end),
        format_date_for_display(week.pay_date)
    );
    for entry in &week.days {
        println!(
            "  {} {:<12} {:<10} {:>6} tips {:>8.2} cash {:>8.2} out {:>7.2}  {}",
            day_name(entry.date),
            format_date_for_display(entry.date),
            entry.role,
            hours_label(entry.hours),
            entry.tips,
            entry.cash_tips,
            entry.tip_outs,
            entry.id
        );
    }
    let t = &week.totals;
    println!(
        "  gross {:.2}  tax {:.2}  net {:.2}  take-home {:.2}  retirement {:.2}",
        t.gross, t.tax, t.net, t.take_home, t.total_retirement
    );
    println!();
}

fn figures_header() -> String {
    format!(
        "{:>8} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10}",
        "Hours", "Gross", "Tax", "Net", "Take-home", "Retire", "Tip-outs"
    )
}

fn figures_row(f: &YtdFigures) -> String {
    format!(
        "{:>8.2} {:>10.2} {:>10.2} {:>10.2} {:>10.2} {:>10.2} {:>10.2}",
        f.hours, f.gross, f.tax, f.net, f.take_home, f.retirement, f.tip_outs
    )
}

fn print_paycheck(entry: &Entry, p: &PaycheckBreakdown) {
    println!(
        "{} {} {} ({})",
        day_name(entry.date),
        to_iso(entry.date),
        entry.role,
        hours_label(entry.hours)
    );
    let rows = [
        ("Hourly pay", p.hourly_pay),
        ("Credit tips", p.tips),
        ("Gross", p.gross),
        ("401k", p.k401),
        ("Other deductions", p.other_deductions),
        ("Taxable income", p.taxable_income),
        ("Social Security", p.social_security),
        ("Medicare", p.medicare),
        ("Federal tax", p.federal_tax),
        ("State tax", p.state_tax),
        ("Roth 401k", p.roth401k),
        ("Net income", p.net_income),
        ("Cash net", p.cash_net),
        ("Take-home", p.take_home),
        ("Employer match", p.employer_match),
        ("Total retirement", p.total_retirement),
    ];
    for (label, value) in rows {
        println!("  {:<18} {:>10.2}", label, value);
    }
}

fn print_settings(settings: &Settings) {
    println!("Tax rate:          {}%", settings.tax_rate);
    println!("401k:              {}%", settings.k401_rate);
    println!("Roth 401k:         {}%", settings.roth401k_rate);
    println!("Employer match:    {}%", settings.employer_match);
    println!("Other deductions:  {}%", settings.other_deductions);
    println!("Theme:             {}", settings.theme);
    print_roles(&settings.roles);
}

fn print_roles(roles: &BTreeMap<String, f64>) {
    println!("Roles:");
    for (name, rate) in roles {
        println!("  {:<14} {:>7.2}/h", name, rate);
    }
}
