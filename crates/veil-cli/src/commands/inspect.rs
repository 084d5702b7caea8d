use veil_core::container::PackageSummary;
use veil_core::fs::read_package;

use crate::app::AppContext;
use crate::cli::InspectArgs;
use crate::ui::{field_table, format_bytes, header, print};

pub fn handle_inspect(app: &AppContext<'_>, args: &InspectArgs) -> anyhow::Result<()> {
    let ui = app.ui(args.json)?;
    let summary = read_package(&args.package)?.summary();

    if ui.mode.is_json() {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    let path = args.package.display().to_string();
    print(&ui, &header(&ui, "inspect", Some(&path)));
    print(&ui, &field_table(&ui, &summary_rows(&summary)));
    Ok(())
}

fn summary_rows(summary: &PackageSummary) -> Vec<(&'static str, String)> {
    let roles = if summary.roles.is_empty() {
        "-".to_string()
    } else {
        summary.roles.join(", ")
    };
    vec![
        ("Format", summary.format_version.clone()),
        ("Glyph", summary.glyph.clone()),
        ("Phrase", summary.phrase.clone()),
        ("Roles", roles),
        (
            "Base image",
            format!(
                "{} ({})",
                summary.base_image_media_type.as_deref().unwrap_or("unknown type"),
                format_bytes(summary.base_image_bytes as u64)
            ),
        ),
        (
            "Hidden",
            format_bytes(summary.hidden_ciphertext_bytes as u64),
        ),
        ("Salt", summary.salt.clone()),
        ("Nonce", summary.nonce.clone()),
        ("Checksum", summary.checksum.clone()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_rows() {
        let summary = PackageSummary {
            format_version: "0.1-json".to_string(),
            glyph: "G".to_string(),
            phrase: "P".to_string(),
            roles: vec![],
            salt: "AAAAAAAAAAAAAAAAAAAAAA==".to_string(),
            nonce: "AAAAAAAAAAAAAAAA".to_string(),
            checksum: "ab".repeat(32),
            base_image_media_type: Some("image/png".to_string()),
            base_image_bytes: 2048,
            hidden_ciphertext_bytes: 100,
        };
        let rows = summary_rows(&summary);

        assert_eq!(rows[3], ("Roles", "-".to_string()));
        assert_eq!(rows[4].1, "image/png (2.0 KB)");
        assert_eq!(rows[5].1, "100 B");
    }
}
