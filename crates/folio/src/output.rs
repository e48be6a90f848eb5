//! Terminal output utilities.

use console::{Style, Term};

/// Rendered documents go to stdout, diagnostics to stderr.
pub(crate) struct Output {
    out: Term,
    err: Term,
    red: Style,
}

impl Output {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            out: Term::stdout(),
            err: Term::stderr(),
            red: Style::new().red(),
        }
    }

    /// Write command output, adding a trailing newline when missing.
    pub(crate) fn document(&self, text: &str) {
        let _ = self.out.write_line(text.strip_suffix('\n').unwrap_or(text));
    }

    /// Print an error message (red).
    pub(crate) fn error(&self, msg: &str) {
        let _ = self.err.write_line(&self.red.apply_to(msg).to_string());
    }
}
