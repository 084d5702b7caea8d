//! Passphrase sourcing and unlock with retry.

use dialoguer::Password;
use secrecy::{ExposeSecret, SecretString};

use veil_core::container::{RevealedImage, VeilPackage};
use veil_core::crypto::PassphrasePolicy;
use veil_core::error::UNLOCK_FAILED_MESSAGE;
use veil_core::{VeilEngine, VeilError};

use crate::constants::{MAX_UNLOCK_ATTEMPTS, PASSPHRASE_ENV};
use crate::errors::CliError;
use crate::ui::{print_error, Spinner, UiContext};

use super::context::AppContext;

fn env_passphrase() -> Option<SecretString> {
    std::env::var(PASSPHRASE_ENV)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(SecretString::from)
}

fn no_passphrase_error() -> CliError {
    CliError::invalid_input_with_hint(
        "No passphrase provided and no TTY available",
        format!("Set {}", PASSPHRASE_ENV),
    )
}

/// Passphrase for a new package, with confirmation when prompting.
///
/// The passphrase must satisfy `policy` whichever way it was supplied.
pub fn read_new_passphrase(
    interactive: bool,
    policy: &PassphrasePolicy,
) -> anyhow::Result<SecretString> {
    let passphrase = match env_passphrase() {
        Some(passphrase) => passphrase,
        None if interactive => Password::new()
            .with_prompt("Enter passphrase")
            .with_confirmation("Confirm passphrase", "Passphrases do not match")
            .interact()
            .map(SecretString::from)
            .map_err(|e| anyhow::anyhow!("Failed to read passphrase: {}", e))?,
        None => return Err(no_passphrase_error().into()),
    };

    policy.check(passphrase.expose_secret()).map_err(|e| {
        CliError::invalid_input_with_hint(
            e.to_string(),
            "Adjust min_passphrase_length under [security] in the config to change the rule",
        )
    })?;
    Ok(passphrase)
}

/// Unlock `package`, prompting again after a rejected passphrase.
///
/// A passphrase from the environment gets exactly one attempt. An
/// interactive user gets up to [`MAX_UNLOCK_ATTEMPTS`]; each is a fresh,
/// independent unlock.
pub fn unlock_with_retry(
    app: &AppContext<'_>,
    ui: &UiContext,
    package: &VeilPackage,
    interactive: bool,
) -> anyhow::Result<RevealedImage> {
    let engine = VeilEngine::new();

    if let Some(passphrase) = env_passphrase() {
        return unlock_once(app, ui, &engine, package, passphrase);
    }
    if !interactive {
        return Err(no_passphrase_error().into());
    }

    for attempt in 1..=MAX_UNLOCK_ATTEMPTS {
        let passphrase = Password::new()
            .with_prompt("Passphrase")
            .interact()
            .map(SecretString::from)
            .map_err(|e| anyhow::anyhow!("Failed to read passphrase: {}", e))?;

        match unlock_once(app, ui, &engine, package, passphrase) {
            Ok(image) => return Ok(image),
            Err(err) if is_unlock_failure(&err) => {
                tracing::debug!(attempt, "unlock attempt rejected");
                if attempt < MAX_UNLOCK_ATTEMPTS {
                    print_error(ui, UNLOCK_FAILED_MESSAGE, Some("Try again"));
                }
            }
            Err(err) => return Err(err),
        }
    }

    Err(CliError::auth_failed_with_hint(
        format!("{} ({} attempts)", UNLOCK_FAILED_MESSAGE, MAX_UNLOCK_ATTEMPTS),
        "Check the passphrase, or run `veil verify` to check the package",
    )
    .into())
}

fn unlock_once(
    app: &AppContext<'_>,
    ui: &UiContext,
    engine: &VeilEngine,
    package: &VeilPackage,
    passphrase: SecretString,
) -> anyhow::Result<RevealedImage> {
    let spinner = Spinner::start(ui, "Deriving key");
    let result = app.block_on(engine.reveal_async(package, passphrase));
    spinner.finish();
    Ok(result??)
}

fn is_unlock_failure(err: &anyhow::Error) -> bool {
    err.downcast_ref::<VeilError>()
        .is_some_and(VeilError::is_unlock_failure)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_unlock_failure() {
        assert!(is_unlock_failure(&anyhow::Error::from(VeilError::UnlockFailed)));
        assert!(!is_unlock_failure(&anyhow::Error::from(VeilError::NotFound(
            "x".into()
        ))));
        assert!(!is_unlock_failure(&anyhow::anyhow!("other")));
    }

    #[test]
    fn test_no_passphrase_error_is_invalid_input() {
        let err = no_passphrase_error();
        assert_eq!(err.exit_code(), crate::constants::exit_codes::INVALID_INPUT);
        assert!(err.to_string().contains(PASSPHRASE_ENV));
    }
}
