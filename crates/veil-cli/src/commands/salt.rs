use veil_core::codec::encode_base64;
use veil_core::container::SALT_SIZE;
use veil_core::random::{OsRandom, RandomSource};

use crate::app::AppContext;
use crate::cli::SaltArgs;
use crate::ui::{hint, kv, print};

/// Print a fresh salt, suitable for `veil create --salt`.
pub fn handle_salt(app: &AppContext<'_>, args: &SaltArgs) -> anyhow::Result<()> {
    let ui = app.ui(args.json)?;
    let salt = encode_base64(&OsRandom.bytes(SALT_SIZE)?);

    if ui.mode.is_json() {
        println!("{}", serde_json::to_string_pretty(&serde_json::json!({ "salt": salt }))?);
    } else if ui.mode.is_pretty() && !app.quiet() {
        print(&ui, &kv(&ui, "Salt", &salt));
        print(&ui, &hint(&ui, "veil create --salt <SALT> ..."));
    } else {
        println!("{}", salt);
    }
    Ok(())
}
