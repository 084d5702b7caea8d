//! Application context for the Veil CLI.
//!
//! Bundles CLI arguments with the lazily-loaded config file and the async
//! runtime used for key derivation.

use std::future::Future;
use std::io::IsTerminal;

use once_cell::unsync::OnceCell;
use tokio::runtime::{Builder, Runtime};

use crate::cli::Cli;
use crate::config::{load_config, resolve_config_path, VeilConfig};
use crate::ui::UiContext;

pub struct AppContext<'a> {
    cli: &'a Cli,
    config: OnceCell<VeilConfig>,
    runtime: OnceCell<Runtime>,
}

impl<'a> AppContext<'a> {
    pub fn new(cli: &'a Cli) -> Self {
        Self {
            cli,
            config: OnceCell::new(),
            runtime: OnceCell::new(),
        }
    }

    pub fn quiet(&self) -> bool {
        self.cli.quiet
    }

    /// Get the config, loading it on first use. A missing file yields defaults.
    pub fn config(&self) -> anyhow::Result<&VeilConfig> {
        self.config
            .get_or_try_init(|| load_config(&resolve_config_path()?))
    }

    /// UI context for a command, merging global flags with the `[ui]` section.
    pub fn ui(&self, json: bool) -> anyhow::Result<UiContext> {
        let ui = &self.config()?.ui;
        Ok(UiContext::from_env(
            json,
            self.cli.no_color || !ui.color,
            self.cli.ascii || ui.ascii,
        ))
    }

    /// UI context from global flags alone.
    pub fn ui_from_flags(&self, json: bool) -> UiContext {
        UiContext::from_env(json, self.cli.no_color, self.cli.ascii)
    }

    /// Whether prompts may be shown.
    pub fn interactive(&self, no_input: bool) -> bool {
        !no_input && std::io::stdin().is_terminal()
    }

    /// Drive `future` to completion on a current-thread runtime built on first use.
    pub fn block_on<F: Future>(&self, future: F) -> anyhow::Result<F::Output> {
        let runtime = self.runtime.get_or_try_init(|| {
            Builder::new_current_thread()
                .enable_all()
                .build()
                .map_err(|e| anyhow::anyhow!("Failed to start async runtime: {}", e))
        })?;
        Ok(runtime.block_on(future))
    }
}
