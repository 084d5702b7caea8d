use veil_core::digest::sha256_hex;
use veil_core::fs::read_package;

use crate::app::AppContext;
use crate::cli::VerifyArgs;
use crate::ui::{badge, hint, print, Badge};

/// Compare the stored checksum with the ciphertext. Needs no passphrase.
pub fn handle_verify(app: &AppContext<'_>, args: &VerifyArgs) -> anyhow::Result<()> {
    let ui = app.ui(args.json)?;
    let package = read_package(&args.package)?;
    let result = package.verify_integrity();

    if ui.mode.is_json() {
        let value = serde_json::json!({
            "status": if result.is_ok() { "ok" } else { "mismatch" },
            "expected": package.meta().checksum,
            "actual": sha256_hex(package.hidden_ciphertext()),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else if result.is_ok() && !app.quiet() {
        print(&ui, &badge(&ui, Badge::Ok, "Integrity verified"));
        print(&ui, &hint(&ui, "This does not check the passphrase"));
    }

    result?;
    Ok(())
}
