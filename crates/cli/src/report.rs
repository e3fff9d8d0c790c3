use std::io::{self, Write};

use sheetdiff_recon::Reporter;

/// Report transcript on stdout, failure notes on stderr.
pub struct StdReporter {
    quiet: bool,
}

impl StdReporter {
    /// With `quiet`, only the stderr side is printed.
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }
}

impl Reporter for StdReporter {
    fn info(&mut self, line: &str) {
        if self.quiet {
            return;
        }
        // A closed stdout (e.g. piped into `head`) must not abort the run.
        let _ = writeln!(io::stdout().lock(), "{line}");
    }

    fn error(&mut self, line: &str) {
        let _ = writeln!(io::stderr().lock(), "{line}");
    }
}
