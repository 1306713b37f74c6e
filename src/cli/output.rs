//! Colored terminal output for promotion flows
//!
//! Status lines share one rendering path: an optional colored symbol followed
//! by the message. Errors always go to stderr and ignore quiet mode.

use std::io::Write;
use termcolor::{BufferWriter, Color, ColorChoice, ColorSpec, WriteColor};

/// Output manager for consistent colored terminal output
#[derive(Debug)]
pub struct OutputManager {
    stdout: BufferWriter,
    quiet: bool,
}

impl Clone for OutputManager {
    fn clone(&self) -> Self {
        Self::new(self.quiet)
    }
}

/// Visual style of a status line
#[derive(Debug, Clone, Copy)]
enum Tone {
    Info,
    Success,
    Warn,
    Progress,
}

impl Tone {
    fn symbol(self) -> &'static str {
        match self {
            Tone::Info => "ℹ",
            Tone::Success => "✓",
            Tone::Warn => "⚠",
            Tone::Progress => "$",
        }
    }

    fn spec(self) -> ColorSpec {
        let mut spec = ColorSpec::new();
        match self {
            Tone::Info => spec.set_fg(Some(Color::Cyan)),
            Tone::Success => spec.set_fg(Some(Color::Green)).set_bold(true),
            Tone::Warn => spec.set_fg(Some(Color::Yellow)).set_bold(true),
            Tone::Progress => spec.set_fg(Some(Color::Magenta)),
        };
        spec
    }
}

impl OutputManager {
    /// Create a new output manager. Quiet mode suppresses everything but errors.
    pub fn new(quiet: bool) -> Self {
        Self {
            stdout: BufferWriter::stdout(ColorChoice::Auto),
            quiet,
        }
    }

    fn status(&self, tone: Tone, message: &str) -> std::io::Result<()> {
        if self.quiet {
            return Ok(());
        }

        let mut buffer = self.stdout.buffer();
        buffer.set_color(&tone.spec())?;
        write!(&mut buffer, "{}", tone.symbol())?;
        buffer.reset()?;
        writeln!(&mut buffer, " {message}")?;
        self.stdout.print(&buffer)
    }

    /// Print an info message
    pub fn info(&self, message: &str) -> std::io::Result<()> {
        self.status(Tone::Info, message)
    }

    /// Print a success message
    pub fn success(&self, message: &str) -> std::io::Result<()> {
        self.status(Tone::Success, message)
    }

    /// Print a warning message
    pub fn warn(&self, message: &str) -> std::io::Result<()> {
        self.status(Tone::Warn, message)
    }

    /// Echo an external command about to run
    pub fn progress(&self, message: &str) -> std::io::Result<()> {
        self.status(Tone::Progress, message)
    }

    /// Print an error message (always shown)
    pub fn error(&self, message: &str) {
        let stderr = BufferWriter::stderr(ColorChoice::Auto);
        let mut buffer = stderr.buffer();

        let written = buffer
            .set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))
            .and_then(|()| write!(&mut buffer, "✗"))
            .and_then(|()| buffer.reset())
            .and_then(|()| writeln!(&mut buffer, " {message}"))
            .and_then(|()| stderr.print(&buffer));

        if written.is_err() {
            // Stderr failed - fallback to stdout as last resort
            println!("[STDERR ERROR] ✗ {message}");
        }
    }

    /// Print a section header
    pub fn section(&self, title: &str) -> std::io::Result<()> {
        if self.quiet {
            return Ok(());
        }

        let mut buffer = self.stdout.buffer();
        writeln!(&mut buffer)?;
        buffer.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)).set_bold(true))?;
        writeln!(&mut buffer, "═══ {title} ═══")?;
        buffer.reset()?;
        self.stdout.print(&buffer)
    }

    /// Print indented text (for sub-items)
    pub fn indent(&self, message: &str) -> std::io::Result<()> {
        self.println(&format!("    {message}"))
    }

    /// Print a plain message (respects quiet mode)
    pub fn println(&self, message: &str) -> std::io::Result<()> {
        if self.quiet {
            return Ok(());
        }

        let mut buffer = self.stdout.buffer();
        writeln!(&mut buffer, "{message}")?;
        self.stdout.print(&buffer)
    }

    /// Check if quiet mode is enabled
    pub fn is_quiet(&self) -> bool {
        self.quiet
    }
}
