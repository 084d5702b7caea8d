use veil_core::fs::{read_package, write_private};

use crate::app::{unlock_with_retry, AppContext};
use crate::cli::RevealArgs;
use crate::helpers::ensure_writable;
use crate::ui::{badge, format_bytes, print, receipt, Badge};

pub fn handle_reveal(app: &AppContext<'_>, args: &RevealArgs) -> anyhow::Result<()> {
    let config = app.config()?;
    let ui = app.ui(args.json)?;

    ensure_writable(&args.out, args.force)?;
    let package = read_package(&args.package)?;

    // Checked before prompting so an altered package never asks for a passphrase.
    let check_integrity = config.security.verify_integrity && !args.skip_integrity;
    if check_integrity {
        package.verify_integrity()?;
    }

    let image = unlock_with_retry(app, &ui, &package, app.interactive(args.no_input))?;
    write_private(&args.out, image.as_bytes()).map_err(|e| {
        anyhow::anyhow!("Failed to write hidden image {}: {}", args.out.display(), e)
    })?;
    tracing::info!(path = %args.out.display(), "hidden image written");

    let out_display = args.out.display().to_string();
    let integrity = if check_integrity { "verified" } else { "skipped" };
    if ui.mode.is_json() {
        let value = serde_json::json!({
            "status": "ok",
            "path": out_display,
            "bytes": image.len(),
            "integrity": integrity,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else if !app.quiet() {
        let size = format_bytes(image.len() as u64);
        print(
            &ui,
            &receipt(
                &ui,
                "Hidden image revealed",
                &[
                    ("Path", out_display.as_str()),
                    ("Size", size.as_str()),
                    ("Integrity", integrity),
                ],
            ),
        );
        if !check_integrity {
            print(&ui, &badge(&ui, Badge::Warn, "Integrity check was skipped"));
        }
    }
    Ok(())
}
