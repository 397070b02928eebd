//! Command handlers shared by the `autopricing` binary and its tests.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::Utc;
use clap::ValueEnum;
use pricing_core::calculations::common::format_currency;
use pricing_core::report::{CsvRenderer, Report, ReportRenderer, TextRenderer, report_file_name};
use pricing_core::store::{MemoryStoreFactory, StoreRegistry};
use pricing_core::{HistoryStore, KeyValueStore, PricingForm, PricingRecord, Theme, ThemePreference};
use pricing_store_sqlite::SqliteStoreFactory;
use tracing::{debug, info};

use crate::config::AppConfig;
use crate::state::{Action, AppState, Status};

/// Registry with every backend this build can talk to.
pub fn build_registry() -> StoreRegistry {
    let mut registry = StoreRegistry::new();
    registry.register(Box::new(SqliteStoreFactory));
    registry.register(Box::new(MemoryStoreFactory));
    registry
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    #[default]
    Text,
    Csv,
}

impl ExportFormat {
    fn renderer(
        self,
        currency_symbol: &str,
    ) -> Box<dyn ReportRenderer> {
        match self {
            Self::Text => Box::new(TextRenderer::new(currency_symbol)),
            Self::Csv => Box::new(CsvRenderer),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ThemeCommand {
    #[default]
    Show,
    Dark,
    Light,
    Toggle,
}

/// What to do with a freshly calculated record besides printing it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CalcOptions {
    pub save: bool,
    pub export_dir: Option<PathBuf>,
    pub format: ExportFormat,
}

/// An opened store plus the state it feeds.
pub struct Session {
    config: AppConfig,
    store: Box<dyn KeyValueStore>,
    state: AppState,
}

impl Session {
    /// Opens the backend named in `config` and loads the saved theme.
    pub async fn open(config: AppConfig) -> Result<Self> {
        let store_config = config.store_config();
        debug!(backend = %store_config.backend, "opening store");
        let store = build_registry()
            .create(&store_config)
            .await
            .with_context(|| format!("failed to open {} store", store_config.backend))?;
        Self::with_store(config, store).await
    }

    pub async fn with_store(
        config: AppConfig,
        store: Box<dyn KeyValueStore>,
    ) -> Result<Self> {
        let mut state = AppState::new(config.parse_policy());
        let theme = ThemePreference::new(store.as_ref())
            .load()
            .await
            .context("failed to read theme preference")?;
        state.update(Action::ThemeChanged(theme));
        Ok(Self {
            config,
            store,
            state,
        })
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }

    /// Prices `form`, prints the text report and optionally saves or exports
    /// the record.
    pub async fn calculate(
        &mut self,
        form: PricingForm,
        options: &CalcOptions,
        out: &mut dyn Write,
    ) -> Result<PricingRecord> {
        self.state.update(Action::SelectMode(form.mode()));
        self.state.update(Action::EditForm(form));
        self.state.update(Action::Calculate { at: Utc::now() });

        let record = match (&self.state.current, &self.state.status) {
            (Some(record), _) => record.clone(),
            (None, Some(Status::Error(message))) => bail!("{message}"),
            (None, _) => bail!("calculation produced no result"),
        };

        self.text_renderer()
            .render(&Report::from(&record), out)
            .context("failed to print report")?;

        if options.save {
            let history = HistoryStore::new(self.store.as_ref())
                .append(record.clone())
                .await
                .context("failed to save calculation")?;
            self.state.update(Action::Saved(history));
            writeln!(out, "\nCalculation saved to history.")?;
        }

        if let Some(dir) = &options.export_dir {
            let path = self.export(&record, dir, options.format)?;
            writeln!(out, "Report written to {}", path.display())?;
        }

        Ok(record)
    }

    /// Prints one line per saved record, newest first.
    pub async fn history_list(
        &mut self,
        out: &mut dyn Write,
    ) -> Result<()> {
        self.reload_history().await?;
        self.state.update(Action::ShowHistory);

        if self.state.history.is_empty() {
            writeln!(out, "No saved calculations.")?;
            return Ok(());
        }

        writeln!(
            out,
            "{:>3}  {:<20}  {:<18}  {:<24}  {:>14}",
            "#", "Date", "Mode", "Product", "Total"
        )?;
        for (index, record) in self.state.history.iter().enumerate() {
            writeln!(
                out,
                "{:>3}  {:<20}  {:<18}  {:<24}  {:>14}",
                index,
                record.timestamp().format("%Y-%m-%d %H:%M").to_string(),
                record.mode().label(),
                record.product_name(),
                format_currency(&self.config.pricing.currency_symbol, record.total()),
            )?;
        }
        Ok(())
    }

    /// Prints the full report for the record at `index`.
    pub async fn history_show(
        &mut self,
        index: usize,
        out: &mut dyn Write,
    ) -> Result<()> {
        let record = self.record_at(index).await?;
        self.text_renderer()
            .render(&Report::from(&record), out)
            .context("failed to print report")?;
        Ok(())
    }

    pub async fn history_delete(
        &mut self,
        index: usize,
        out: &mut dyn Write,
    ) -> Result<()> {
        let history = HistoryStore::new(self.store.as_ref())
            .delete_at(index)
            .await
            .with_context(|| format!("failed to delete calculation {index}"))?;
        self.state.update(Action::HistoryLoaded(history));
        writeln!(
            out,
            "Deleted calculation {index}; {} remaining.",
            self.state.history.len()
        )?;
        Ok(())
    }

    pub async fn history_clear(
        &mut self,
        out: &mut dyn Write,
    ) -> Result<()> {
        HistoryStore::new(self.store.as_ref())
            .clear()
            .await
            .context("failed to clear history")?;
        self.state.update(Action::HistoryLoaded(Vec::new()));
        writeln!(out, "History cleared.")?;
        Ok(())
    }

    /// Writes the record at `index` to `dir` and returns the file path.
    pub async fn history_export(
        &mut self,
        index: usize,
        dir: &Path,
        format: ExportFormat,
        out: &mut dyn Write,
    ) -> Result<PathBuf> {
        let record = self.record_at(index).await?;
        let path = self.export(&record, dir, format)?;
        writeln!(out, "Report written to {}", path.display())?;
        Ok(path)
    }

    pub async fn theme(
        &mut self,
        command: ThemeCommand,
        out: &mut dyn Write,
    ) -> Result<Theme> {
        let prefs = ThemePreference::new(self.store.as_ref());
        let theme = match command {
            ThemeCommand::Show => prefs.load().await?,
            ThemeCommand::Toggle => prefs.toggle().await?,
            ThemeCommand::Dark => {
                prefs.save(Theme::Dark).await?;
                Theme::Dark
            }
            ThemeCommand::Light => {
                prefs.save(Theme::Light).await?;
                Theme::Light
            }
        };
        if command != ThemeCommand::Show {
            info!(%theme, "theme changed");
        }
        self.state.update(Action::ThemeChanged(theme));
        writeln!(out, "Theme: {theme}")?;
        Ok(theme)
    }

    async fn reload_history(&mut self) -> Result<()> {
        let history = HistoryStore::new(self.store.as_ref())
            .load()
            .await
            .context("failed to load history")?;
        self.state.update(Action::HistoryLoaded(history));
        Ok(())
    }

    async fn record_at(
        &self,
        index: usize,
    ) -> Result<PricingRecord> {
        HistoryStore::new(self.store.as_ref())
            .get(index)
            .await
            .context("failed to load history")?
            .with_context(|| format!("no saved calculation at index {index}"))
    }

    fn text_renderer(&self) -> TextRenderer {
        TextRenderer::new(self.config.pricing.currency_symbol.as_str())
    }

    fn export(
        &self,
        record: &PricingRecord,
        dir: &Path,
        format: ExportFormat,
    ) -> Result<PathBuf> {
        let renderer = format.renderer(&self.config.pricing.currency_symbol);
        let path = dir.join(report_file_name(record.product_name(), renderer.extension()));

        let file = File::create(&path)
            .with_context(|| format!("cannot create report file '{}'", path.display()))?;
        let mut writer = BufWriter::new(file);
        renderer
            .render(&Report::from(record), &mut writer)
            .with_context(|| format!("failed to write report '{}'", path.display()))?;
        writer.flush()?;

        info!(path = %path.display(), "report exported");
        Ok(path)
    }
}
