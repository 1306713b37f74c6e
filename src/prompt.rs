//! Blocking yes/no confirmation.

use std::io::{BufRead, Write};

/// Synchronous confirmation capability
pub trait Prompter {
    /// Ask `text`; true only on an explicit yes
    fn confirm(&mut self, text: &str) -> std::io::Result<bool>;
}

/// Write `"<text> (y/N) "`, read one line, and accept only `y`/`Y`.
///
/// Surrounding whitespace is ignored. Empty input, end of input and anything
/// else (including `yes`) count as no. There is no retry.
pub fn confirm<R: BufRead, W: Write>(
    text: &str,
    input: &mut R,
    output: &mut W,
) -> std::io::Result<bool> {
    write!(output, "{text} (y/N) ")?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().eq_ignore_ascii_case("y"))
}

/// [`Prompter`] over arbitrary streams
#[derive(Debug)]
pub struct StreamPrompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> StreamPrompter<R, W> {
    /// Prompt on `output`, read answers from `input`
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Recover the streams, e.g. to inspect what was written
    pub fn into_parts(self) -> (R, W) {
        (self.input, self.output)
    }
}

impl<R: BufRead, W: Write> Prompter for StreamPrompter<R, W> {
    fn confirm(&mut self, text: &str) -> std::io::Result<bool> {
        confirm(text, &mut self.input, &mut self.output)
    }
}

/// Prompter bound to the process's stdin and stdout
pub fn terminal() -> StreamPrompter<std::io::StdinLock<'static>, std::io::Stdout> {
    StreamPrompter::new(std::io::stdin().lock(), std::io::stdout())
}
