use crate::app::AppContext;
use crate::cli::InitArgs;
use crate::config::{resolve_config_path, write_config, VeilConfig};
use crate::errors::CliError;
use crate::ui::{hint, print, receipt};

/// Write a starter config file with every default spelled out.
pub fn handle_init(app: &AppContext<'_>, args: &InitArgs) -> anyhow::Result<()> {
    // Not loaded: the existing config may be unparseable.
    let ui = app.ui_from_flags(false);
    let path = resolve_config_path()?;

    if path.exists() && !args.force {
        return Err(CliError::invalid_input_with_hint(
            format!("Config already exists at {}", path.display()),
            "Pass --force to replace it",
        )
        .into());
    }

    write_config(&path, &VeilConfig::starter())?;
    tracing::info!(path = %path.display(), "config written");

    if !app.quiet() {
        let path_display = path.display().to_string();
        print(
            &ui,
            &receipt(&ui, "Config written", &[("Path", path_display.as_str())]),
        );
        print(&ui, &hint(&ui, "veil create --base <FILE> --hidden <FILE>"));
    }
    Ok(())
}
