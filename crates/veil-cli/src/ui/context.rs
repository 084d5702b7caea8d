//! What the terminal supports, combined with the user's display flags.

use std::io::IsTerminal;

use super::mode::OutputMode;

const FALLBACK_WIDTH: usize = 80;

/// Facts about the terminal, read once per invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TermProbe {
    pub stdout_tty: bool,
    pub dumb: bool,
    /// `NO_COLOR` is set to anything
    pub no_color_env: bool,
    pub columns: Option<usize>,
}

impl TermProbe {
    pub fn detect() -> Self {
        Self {
            stdout_tty: std::io::stdout().is_terminal(),
            dumb: std::env::var("TERM").is_ok_and(|term| term == "dumb"),
            no_color_env: std::env::var_os("NO_COLOR").is_some(),
            columns: columns_from_env().or_else(columns_from_tty),
        }
    }
}

/// Resolved presentation settings for one command.
#[derive(Debug, Clone)]
pub struct UiContext {
    pub is_tty: bool,
    pub color: bool,
    pub unicode: bool,
    pub width: usize,
    pub mode: OutputMode,
}

impl UiContext {
    /// Probe the terminal and apply `--json`, `--no-color` and `--ascii`
    /// (or their `[ui]` config equivalents).
    pub fn from_env(json_flag: bool, no_color: bool, ascii: bool) -> Self {
        Self::resolve(&TermProbe::detect(), json_flag, no_color, ascii)
    }

    pub fn resolve(probe: &TermProbe, json_flag: bool, no_color: bool, ascii: bool) -> Self {
        let mode = OutputMode::resolve(json_flag, probe.stdout_tty, probe.dumb);
        Self {
            is_tty: probe.stdout_tty,
            color: mode.is_pretty() && !no_color && !probe.no_color_env,
            unicode: !ascii,
            width: probe.columns.unwrap_or(FALLBACK_WIDTH),
            mode,
        }
    }

    /// Spinners only draw in pretty mode on a real terminal.
    pub fn allows_animation(&self) -> bool {
        self.is_tty && self.mode.is_pretty()
    }
}

fn columns_from_env() -> Option<usize> {
    std::env::var("COLUMNS")
        .ok()
        .and_then(|cols| cols.trim().parse::<usize>().ok())
        .filter(|&cols| cols > 0)
}

#[cfg(unix)]
fn columns_from_tty() -> Option<usize> {
    let mut size = std::mem::MaybeUninit::<libc::winsize>::uninit();
    // SAFETY: TIOCGWINSZ fills the struct when it returns 0.
    let rc = unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, size.as_mut_ptr()) };
    if rc != 0 {
        return None;
    }
    // SAFETY: checked rc above.
    let size = unsafe { size.assume_init() };
    (size.ws_col > 0).then_some(size.ws_col as usize)
}

#[cfg(not(unix))]
fn columns_from_tty() -> Option<usize> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tty() -> TermProbe {
        TermProbe {
            stdout_tty: true,
            dumb: false,
            no_color_env: false,
            columns: Some(120),
        }
    }

    #[test]
    fn test_json_flag_wins_on_tty() {
        let ctx = UiContext::resolve(&tty(), true, false, false);
        assert_eq!(ctx.mode, OutputMode::Json);
        assert!(!ctx.color);
        assert!(!ctx.allows_animation());
    }

    #[test]
    fn test_tty_is_pretty_and_colored() {
        let ctx = UiContext::resolve(&tty(), false, false, false);
        assert_eq!(ctx.mode, OutputMode::Pretty);
        assert!(ctx.color);
        assert!(ctx.allows_animation());
        assert_eq!(ctx.width, 120);
    }

    #[test]
    fn test_color_opt_outs() {
        assert!(!UiContext::resolve(&tty(), false, true, false).color);

        let probe = TermProbe {
            no_color_env: true,
            ..tty()
        };
        assert!(!UiContext::resolve(&probe, false, false, false).color);
    }

    #[test]
    fn test_dumb_terminal_is_plain() {
        let probe = TermProbe { dumb: true, ..tty() };
        let ctx = UiContext::resolve(&probe, false, false, false);
        assert_eq!(ctx.mode, OutputMode::Plain);
        assert!(!ctx.color);
    }

    #[test]
    fn test_ascii_and_width_fallback() {
        let probe = TermProbe {
            stdout_tty: false,
            columns: None,
            ..tty()
        };
        let ctx = UiContext::resolve(&probe, false, false, true);
        assert!(!ctx.unicode);
        assert_eq!(ctx.width, FALLBACK_WIDTH);
        assert_eq!(ctx.mode, OutputMode::Plain);
    }
}
