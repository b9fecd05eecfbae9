// 💬 Interaction port - blocking prompts for the editor workflows
//
// The editor only talks to `Prompter`; the line-based implementation works
// over any BufRead/Write pair (stdin/stdout in the binary, Cursor in tests).

use crate::disambiguation::ChoiceSet;
use crate::error::{CatalogError, Result};
use std::io::{self, BufRead, Write};

pub trait Prompter {
    /// Show `text` and block for one line. `None` means input is closed.
    fn prompt(&mut self, text: &str) -> Result<Option<String>>;

    /// Present labelled options and read the selected key.
    fn choose(&mut self, choices: &ChoiceSet) -> Result<Option<String>>;

    /// Tell the user something (errors, confirmations).
    fn report(&mut self, message: &str) -> Result<()>;

    fn clear_screen(&mut self) -> Result<()>;
}

/// Line-oriented prompter over a reader/writer pair.
pub struct LinePrompter<R, W> {
    input: R,
    output: W,
}

impl LinePrompter<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        LinePrompter::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> LinePrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        LinePrompter { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

impl<R: BufRead, W: Write> Prompter for LinePrompter<R, W> {
    fn prompt(&mut self, text: &str) -> Result<Option<String>> {
        write!(self.output, "{}", text).map_err(CatalogError::Terminal)?;
        self.output.flush().map_err(CatalogError::Terminal)?;

        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .map_err(CatalogError::Terminal)?;
        if read == 0 {
            return Ok(None);
        }

        let line = line.trim_end_matches(['\n', '\r']).to_string();
        Ok(Some(line))
    }

    fn choose(&mut self, choices: &ChoiceSet) -> Result<Option<String>> {
        writeln!(self.output, "{}:", choices.title()).map_err(CatalogError::Terminal)?;
        for choice in choices.options() {
            writeln!(self.output, "    {}) {}", choice.key, choice.label)
                .map_err(CatalogError::Terminal)?;
        }

        Ok(self.prompt("Option: ")?.map(|line| line.trim().to_string()))
    }

    fn report(&mut self, message: &str) -> Result<()> {
        writeln!(self.output, "{}", message).map_err(CatalogError::Terminal)
    }

    #[cfg(feature = "tui")]
    fn clear_screen(&mut self) -> Result<()> {
        use crossterm::{cursor::MoveTo, execute, terminal::Clear, terminal::ClearType};

        execute!(self.output, Clear(ClearType::All), MoveTo(0, 0)).map_err(CatalogError::Terminal)
    }

    #[cfg(not(feature = "tui"))]
    fn clear_screen(&mut self) -> Result<()> {
        write!(self.output, "\x1B[2J\x1B[1;1H").map_err(CatalogError::Terminal)?;
        self.output.flush().map_err(CatalogError::Terminal)
    }
}
