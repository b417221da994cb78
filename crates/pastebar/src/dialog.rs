use std::io::{self, BufRead, Write};

use pastebar_app::Dialog;
use tracing::warn;

use crate::config::is_yes;

/// Terminal prompts for the data folder workflow, written to stderr.
pub struct StdinDialog<R> {
    input: R,
    assume_yes: bool,
}

impl StdinDialog<io::StdinLock<'static>> {
    /// Dialog reading answers from stdin. With `assume_yes` every question
    /// is answered yes without prompting.
    pub fn stdin(assume_yes: bool) -> Self {
        Self::new(io::stdin().lock(), assume_yes)
    }
}

impl<R: BufRead> StdinDialog<R> {
    pub const fn new(input: R, assume_yes: bool) -> Self {
        Self { input, assume_yes }
    }
}

impl<R: BufRead> Dialog for StdinDialog<R> {
    fn message(&mut self, text: &str) {
        eprintln!("{text}");
    }

    fn confirm(&mut self, text: &str) -> bool {
        if self.assume_yes {
            eprintln!("{text} [y/N]: y");
            return true;
        }
        eprint!("{text} [y/N]: ");
        if let Err(err) = io::stderr().flush() {
            warn!("failed to flush stderr: {err}");
        }
        let mut answer = String::new();
        match self.input.read_line(&mut answer) {
            Ok(_) => is_yes(&answer),
            Err(err) => {
                warn!("failed to read answer: {err}");
                false
            }
        }
    }
}
