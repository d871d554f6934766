//! Terminal output helpers: colors, symbols and the global output modes.

use std::io::IsTerminal;

/// Env var equivalent of `--json`.
pub const JSON_ENV: &str = "SITE_ATLAS_JSON";
/// Env var equivalent of `--quiet`.
pub const QUIET_ENV: &str = "SITE_ATLAS_QUIET";
/// Env var equivalent of `--no-color`.
pub const NO_COLOR_ENV: &str = "SITE_ATLAS_NO_COLOR";

/// Output modes for one invocation: command-line flags, or the matching
/// env vars when a flag is absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutputMode {
    pub json: bool,
    pub quiet: bool,
    pub no_color: bool,
}

impl OutputMode {
    pub fn resolve(json: bool, quiet: bool, no_color: bool) -> Self {
        Self {
            json: json || std::env::var_os(JSON_ENV).is_some(),
            quiet: quiet || std::env::var_os(QUIET_ENV).is_some(),
            // https://no-color.org/
            no_color: no_color
                || std::env::var_os("NO_COLOR").is_some()
                || std::env::var_os(NO_COLOR_ENV).is_some(),
        }
    }

    /// Whether status lines and spinners go to stderr.
    pub fn interactive(&self) -> bool {
        !self.json && !self.quiet
    }

    /// Whether colored output should be used.
    pub fn color_enabled(&self) -> bool {
        !self.no_color && std::io::stdout().is_terminal()
    }

    pub fn styled(&self) -> Styled {
        Styled {
            use_color: self.color_enabled(),
        }
    }
}

const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";
const DIM: &str = "\x1b[2m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// Colored string builder.
#[derive(Debug, Clone, Copy)]
pub struct Styled {
    use_color: bool,
}

impl Styled {
    /// No escape codes, regardless of environment.
    pub fn plain() -> Self {
        Self { use_color: false }
    }

    pub fn ok_sym(&self) -> &'static str {
        if self.use_color {
            "\x1b[32m\u{2713}\x1b[0m"
        } else {
            "OK"
        }
    }

    pub fn warn_sym(&self) -> &'static str {
        if self.use_color {
            "\x1b[33m\u{26a0}\x1b[0m"
        } else {
            "??"
        }
    }

    fn paint(&self, code: &str, s: &str) -> String {
        if self.use_color {
            format!("{code}{s}{RESET}")
        } else {
            s.to_string()
        }
    }

    pub fn green(&self, s: &str) -> String {
        self.paint(GREEN, s)
    }

    pub fn yellow(&self, s: &str) -> String {
        self.paint(YELLOW, s)
    }

    pub fn cyan(&self, s: &str) -> String {
        self.paint(CYAN, s)
    }

    pub fn dim(&self, s: &str) -> String {
        self.paint(DIM, s)
    }

    pub fn bold(&self, s: &str) -> String {
        self.paint(BOLD, s)
    }
}

/// Print a section header to stderr.
pub fn print_section(s: &Styled, title: &str) {
    eprintln!("  {}", s.bold(title));
}

/// Pretty-print JSON to stdout.
pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// `1 page` / `3 pages`.
pub fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

/// Current UTC time for report headers.
pub fn timestamp() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
}
