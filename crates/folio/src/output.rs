//! Terminal output utilities.
//!
//! Command results go to stdout uncolored so they can be piped. Diagnostics
//! go to stderr.

use console::{Style, Term};

/// Terminal output formatter.
pub(crate) struct Output {
    out: Term,
    err: Term,
    yellow: Style,
    red: Style,
    cyan_bold: Style,
}

impl Output {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            out: Term::stdout(),
            err: Term::stderr(),
            yellow: Style::new().yellow(),
            red: Style::new().red(),
            cyan_bold: Style::new().cyan().bold(),
        }
    }

    /// Write a command result to stdout, ending it with a newline.
    pub(crate) fn result(&self, text: &str) -> std::io::Result<()> {
        if text.ends_with('\n') {
            self.out.write_str(text)
        } else {
            self.out.write_line(text)
        }
    }

    /// Print a warning message (yellow).
    pub(crate) fn warning(&self, msg: &str) {
        let _ = self.err.write_line(&self.yellow.apply_to(msg).to_string());
    }

    /// Print an error message (red).
    pub(crate) fn error(&self, msg: &str) {
        let _ = self.err.write_line(&self.red.apply_to(msg).to_string());
    }

    /// Print a highlighted message (cyan bold) to stdout.
    pub(crate) fn highlight(&self, msg: &str) -> std::io::Result<()> {
        self.out.write_line(&self.cyan_bold.apply_to(msg).to_string())
    }
}
