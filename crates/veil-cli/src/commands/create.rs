use std::path::{Path, PathBuf};

use veil_core::codec::decode_base64;
use veil_core::container::PackageRequest;
use veil_core::crypto::PassphrasePolicy;
use veil_core::fs::{package_file_name, write_package};
use veil_core::VeilEngine;

use crate::app::{read_new_passphrase, AppContext};
use crate::cli::CreateArgs;
use crate::config::CreateSection;
use crate::errors::CliError;
use crate::helpers::{ensure_writable, guess_media_type, read_image};
use crate::ui::{format_bytes, print, receipt, short_digest, Spinner};

pub fn handle_create(app: &AppContext<'_>, args: &CreateArgs) -> anyhow::Result<()> {
    let config = app.config()?;
    let ui = app.ui(args.json)?;

    let out = output_path(args, &config.create);
    ensure_writable(&out, args.force)?;

    let base = read_image(&args.base, "base")?;
    let hidden = read_image(&args.hidden, "hidden")?;
    let request = build_request(args, &config.create, base, hidden)?;

    let policy = PassphrasePolicy::new(config.security.min_passphrase_length);
    let passphrase = read_new_passphrase(app.interactive(args.no_input), &policy)?;

    let engine = VeilEngine::new();
    let spinner = Spinner::start(&ui, "Deriving key");
    let package = app.block_on(engine.build_async(&request, passphrase));
    spinner.finish();
    let package = package??;

    write_package(&out, &package)?;
    tracing::info!(path = %out.display(), "package written");

    let out_display = out.display().to_string();
    if ui.mode.is_json() {
        let value = serde_json::json!({
            "status": "ok",
            "path": out_display,
            "glyph": package.meta().glyph,
            "checksum": package.meta().checksum,
            "hidden_ciphertext_bytes": package.hidden_ciphertext().len(),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else if !app.quiet() {
        let size = format_bytes(package.hidden_ciphertext().len() as u64);
        let checksum = short_digest(&package.meta().checksum);
        print(
            &ui,
            &receipt(
                &ui,
                "Package created",
                &[
                    ("Path", out_display.as_str()),
                    ("Glyph", package.meta().glyph.as_str()),
                    ("Hidden", size.as_str()),
                    ("Checksum", checksum.as_str()),
                ],
            ),
        );
    }
    Ok(())
}

/// `--out`, else `<output_dir or base dir>/<base-stem>.veil.json`.
fn output_path(args: &CreateArgs, defaults: &CreateSection) -> PathBuf {
    if let Some(out) = &args.out {
        return out.clone();
    }
    let stem = args
        .base
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "package".to_string());
    let dir = match &defaults.output_dir {
        Some(dir) => PathBuf::from(dir),
        None => args
            .base
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default(),
    };
    dir.join(package_file_name(&stem))
}

/// Flags win over config defaults, which win over built-in defaults.
fn build_request(
    args: &CreateArgs,
    defaults: &CreateSection,
    base: Vec<u8>,
    hidden: Vec<u8>,
) -> anyhow::Result<PackageRequest> {
    let mut request = match guess_media_type(&args.base) {
        Some(media_type) => PackageRequest::new().base_image_with_type(base, media_type),
        None => PackageRequest::new().base_image(base),
    }
    .hidden_image(hidden);

    if let Some(glyph) = args.glyph.as_ref().or(defaults.glyph.as_ref()) {
        request = request.glyph(glyph.clone());
    }
    if let Some(phrase) = args.phrase.as_ref().or(defaults.phrase.as_ref()) {
        request = request.phrase(phrase.clone());
    }
    if !args.roles.is_empty() {
        request = request.roles(args.roles.iter().cloned());
    } else if let Some(roles) = &defaults.roles {
        request = request.roles(roles.iter().cloned());
    }
    if let Some(salt) = &args.salt {
        let bytes = decode_base64(salt)
            .map_err(|e| CliError::invalid_input(format!("Invalid --salt: {}", e)))?;
        request = request.salt(bytes);
    }
    Ok(request)
}
