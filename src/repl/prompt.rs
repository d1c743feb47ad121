//! Line-oriented prompt helpers.
//!
//! Generic over the input and output streams so sessions can be driven from
//! in-memory buffers. Every reader returns `Ok(None)` at end of input.

use std::io::{self, BufRead, Write};

/// Input prompt prefix.
pub const PREFIX: &str = "$ ";

/// Prefix of lines printed by the wallet.
pub const PRINT_PREFIX: &str = ">";

pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn output(&self) -> &W {
        &self.output
    }

    pub fn into_inner(self) -> (R, W) {
        (self.input, self.output)
    }

    /// Print one line with the wallet prefix.
    pub fn say(&mut self, text: impl AsRef<str>) -> io::Result<()> {
        writeln!(self.output, "{} {}", PRINT_PREFIX, text.as_ref())
    }

    /// Print `msg` after the input prefix and read one line.
    pub fn read_line(&mut self, msg: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}{}", PREFIX, msg)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    /// Ask until the answer is not blank.
    pub fn input_not_blank(&mut self, msg: &str) -> io::Result<Option<String>> {
        loop {
            let Some(input) = self.read_line(msg)? else {
                return Ok(None);
            };
            let input = input.trim();
            if !input.is_empty() {
                return Ok(Some(input.to_string()));
            }
            self.say("please enter a value.")?;
        }
    }

    /// Ask until the answer is `y` or `n`.
    pub fn yes_or_no(&mut self, msg: &str) -> io::Result<Option<bool>> {
        loop {
            let Some(input) = self.read_line(msg)? else {
                return Ok(None);
            };
            match input.trim() {
                "y" => return Ok(Some(true)),
                "n" => return Ok(Some(false)),
                _ => self.say("invalid command.")?,
            }
        }
    }

    /// List `names` and ask until one of them is typed.
    ///
    /// `quit` or `exit` cancels the choice.
    pub fn multiple_choice(&mut self, names: &[String]) -> io::Result<Option<String>> {
        if names.is_empty() {
            return Ok(None);
        }
        loop {
            for name in names {
                self.say(name)?;
            }
            let Some(input) = self.read_line("")? else {
                return Ok(None);
            };
            let input = input.trim();
            if let Some(name) = names.iter().find(|name| name.as_str() == input) {
                return Ok(Some(name.clone()));
            }
            if input == "quit" || input == "exit" {
                return Ok(None);
            }
            self.say("invalid command.")?;
        }
    }
}
