//! Interactive warm-up question.

use std::io::{self, IsTerminal};

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

const WARM_UP_QUESTION: &str = "Do you like to have a warm-up stage (y/[n])? ";

/// True when both stdin and stdout are terminals. The question is written to
/// stdout, so it must not be asked when the report is being redirected.
pub fn is_interactive() -> bool {
    io::stdin().is_terminal() && io::stdout().is_terminal()
}

/// Ask whether to run the warm-up pass. End of input or Ctrl-C counts as no.
pub fn ask_warm_up() -> anyhow::Result<bool> {
    let mut rl = DefaultEditor::new()?;

    match rl.readline(WARM_UP_QUESTION) {
        Ok(line) => Ok(is_yes(&line)),
        Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(false),
        Err(err) => Err(err.into()),
    }
}

/// `y` or `yes` in any case. Anything else, including an empty line, is no.
pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
