use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing::debug;

use pricing_cli::app::{CalcOptions, ExportFormat, Session, ThemeCommand};
use pricing_cli::config::{AppConfig, ConfigOverrides, LoadOptions};
use pricing_cli::logging;
use pricing_core::form::{ItemizedForm, UnitCostForm};
use pricing_core::{PricingForm, TimeUnit};

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Cost-plus pricing calculator.
///
/// Prices a product from its itemized costs or from per-unit production
/// costs, and keeps a history of saved calculations.
#[derive(Debug, Parser)]
#[command(name = "autopricing", version)]
struct Cli {
    /// Config file. Defaults to `./autopricing.toml` when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Storage backend (`sqlite` or `memory`).
    #[arg(long, global = true)]
    backend: Option<String>,

    /// Storage connection string.
    /// For SQLite this is a file path (e.g. `autopricing.db`) or `:memory:`.
    #[arg(long, global = true)]
    db: Option<String>,

    /// Log filter, e.g. `debug` or `pricing_core=trace`.
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Append log output to this file.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Reject empty names, malformed and negative numbers instead of
    /// treating them as zero.
    #[arg(long, global = true)]
    strict: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Price a product from material, labor and overhead costs.
    Itemized(ItemizedArgs),
    /// Price a product from fixed and variable production costs.
    Unit(UnitArgs),
    /// Inspect and manage saved calculations.
    #[command(subcommand)]
    History(HistoryCommand),
    /// Show or change the theme preference.
    Theme {
        #[arg(value_enum, default_value_t = ThemeCommand::Show)]
        action: ThemeCommand,
    },
}

#[derive(Debug, Args)]
struct ItemizedArgs {
    #[arg(long, default_value = "")]
    name: String,
    #[arg(long, default_value = "")]
    material: String,
    #[arg(long, default_value = "")]
    labor: String,
    #[arg(long, default_value = "")]
    overhead: String,
    /// Profit margin in percent.
    #[arg(long, default_value = "")]
    profit: String,
    /// Discount in percent.
    #[arg(long, default_value = "")]
    discount: String,
    /// Tax in percent.
    #[arg(long, default_value = "")]
    tax: String,
    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Debug, Args)]
struct UnitArgs {
    #[arg(long, default_value = "")]
    name: String,
    /// Fixed costs for the period.
    #[arg(long, default_value = "")]
    fixed: String,
    /// Variable cost per unit.
    #[arg(long, default_value = "")]
    variable: String,
    /// Units produced in the period.
    #[arg(long, default_value = "")]
    units: String,
    /// Markup in percent.
    #[arg(long, default_value = "")]
    markup: String,
    #[arg(long, default_value = "month", value_parser = parse_time_unit)]
    time_unit: TimeUnit,
    /// Add 12% VAT to the selling price.
    #[arg(long)]
    vat: bool,
    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Debug, Args)]
struct OutputArgs {
    /// Save the calculation to history.
    #[arg(long)]
    save: bool,
    /// Also write the report into this directory.
    #[arg(long)]
    export: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = ExportFormat::Text)]
    format: ExportFormat,
}

#[derive(Debug, Subcommand)]
enum HistoryCommand {
    /// List saved calculations, newest first.
    List,
    /// Print the report for one saved calculation.
    Show { index: usize },
    /// Delete one saved calculation.
    Delete { index: usize },
    /// Delete every saved calculation.
    Clear,
    /// Write the report for one saved calculation to a file.
    Export {
        index: usize,
        #[arg(long, default_value = ".")]
        dir: PathBuf,
        #[arg(long, value_enum, default_value_t = ExportFormat::Text)]
        format: ExportFormat,
    },
}

fn parse_time_unit(s: &str) -> Result<TimeUnit, String> {
    TimeUnit::parse(s)
        .ok_or_else(|| format!("unknown time unit '{s}' (expected day, week or month)"))
}

impl Cli {
    fn load_options(&self) -> LoadOptions {
        LoadOptions {
            config_path: self.config.clone(),
            overrides: ConfigOverrides {
                backend: self.backend.clone(),
                connection: self.db.clone(),
                log_level: self.log_level.clone(),
                log_file: self.log_file.clone(),
                strict: self.strict.then_some(true),
            },
        }
    }
}

impl OutputArgs {
    fn options(&self) -> CalcOptions {
        CalcOptions {
            save: self.save,
            export_dir: self.export.clone(),
            format: self.format,
        }
    }
}

impl From<ItemizedArgs> for PricingForm {
    fn from(args: ItemizedArgs) -> Self {
        PricingForm::Itemized(ItemizedForm {
            product_name: args.name,
            material_cost: args.material,
            labor_cost: args.labor,
            overhead_expenses: args.overhead,
            profit_percentage: args.profit,
            discount_percentage: args.discount,
            tax_percentage: args.tax,
        })
    }
}

impl From<UnitArgs> for PricingForm {
    fn from(args: UnitArgs) -> Self {
        PricingForm::UnitCost(UnitCostForm {
            product_name: args.name,
            fixed_costs: args.fixed,
            variable_cost_per_unit: args.variable,
            units_produced: args.units,
            markup_percentage: args.markup,
            time_unit: args.time_unit,
            include_vat: args.vat,
        })
    }
}

// ─── entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_logging(logging::DEFAULT_LEVEL);

    let cli = Cli::parse();

    let config = AppConfig::load(cli.load_options()).context("failed to load configuration")?;
    logging::set_log_level(&config.log.level)?;
    if let Some(path) = &config.log.file {
        logging::enable_file_logging(path)?;
    }
    debug!(?config, "configuration loaded");

    let mut session = Session::open(config).await?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Command::Itemized(args) => {
            let options = args.output.options();
            session.calculate(args.into(), &options, &mut out).await?;
        }
        Command::Unit(args) => {
            let options = args.output.options();
            session.calculate(args.into(), &options, &mut out).await?;
        }
        Command::History(command) => match command {
            HistoryCommand::List => session.history_list(&mut out).await?,
            HistoryCommand::Show { index } => session.history_show(index, &mut out).await?,
            HistoryCommand::Delete { index } => session.history_delete(index, &mut out).await?,
            HistoryCommand::Clear => session.history_clear(&mut out).await?,
            HistoryCommand::Export { index, dir, format } => {
                session
                    .history_export(index, &dir, format, &mut out)
                    .await?;
            }
        },
        Command::Theme { action } => {
            session.theme(action, &mut out).await?;
        }
    }

    out.flush()?;
    Ok(())
}
