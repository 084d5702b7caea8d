use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};
use clap_complete::Shell;

use veil_core::VERSION;

/// Veil - hide an image inside a passphrase-locked package
#[derive(Parser)]
#[command(name = "veil")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Use ASCII symbols only
    #[arg(long, global = true)]
    pub ascii: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build a package from a base image and a hidden image
    Create(CreateArgs),

    /// Unlock a package and write out the hidden image
    Reveal(RevealArgs),

    /// Check a package's stored checksum without unlocking it
    Verify(VerifyArgs),

    /// Show a package's metadata
    Inspect(InspectArgs),

    /// Print a freshly generated salt
    Salt(SaltArgs),

    /// Write a default config file
    Init(InitArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Arguments for the `create` command
#[derive(Args)]
pub struct CreateArgs {
    /// Always-visible base image
    #[arg(long, value_name = "FILE")]
    pub base: PathBuf,

    /// Image to hide
    #[arg(long, value_name = "FILE")]
    pub hidden: PathBuf,

    /// Output package path (default: <base-stem>.veil.json)
    #[arg(short, long, value_name = "FILE")]
    pub out: Option<PathBuf>,

    /// Glyph label recorded in the package
    #[arg(long)]
    pub glyph: Option<String>,

    /// Caption recorded in the package
    #[arg(long)]
    pub phrase: Option<String>,

    /// Viewer role (repeatable)
    #[arg(long = "role", value_name = "ROLE")]
    pub roles: Vec<String>,

    /// Use this base64 salt instead of generating one
    #[arg(long, value_name = "BASE64")]
    pub salt: Option<String>,

    /// Overwrite an existing output file
    #[arg(long)]
    pub force: bool,

    /// Disable interactive prompts
    #[arg(long)]
    pub no_input: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `reveal` command
#[derive(Args)]
pub struct RevealArgs {
    /// Package to unlock
    #[arg(value_name = "PACKAGE")]
    pub package: PathBuf,

    /// Where to write the hidden image
    #[arg(short, long, value_name = "FILE")]
    pub out: PathBuf,

    /// Skip the checksum comparison before unlocking
    #[arg(long)]
    pub skip_integrity: bool,

    /// Overwrite an existing output file
    #[arg(long)]
    pub force: bool,

    /// Disable interactive prompts
    #[arg(long)]
    pub no_input: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `verify` command
#[derive(Args)]
pub struct VerifyArgs {
    /// Package to check
    #[arg(value_name = "PACKAGE")]
    pub package: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `inspect` command
#[derive(Args)]
pub struct InspectArgs {
    /// Package to inspect
    #[arg(value_name = "PACKAGE")]
    pub package: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `salt` command
#[derive(Args)]
pub struct SaltArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `init` command
#[derive(Args)]
pub struct InitArgs {
    /// Replace an existing config file
    #[arg(long)]
    pub force: bool,
}
