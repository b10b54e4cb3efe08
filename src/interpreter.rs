use crate::command::{CommandTable, Reply};
use crate::error::{Error, Result};
use crate::tokenizer::{self, Tokenizer};
use std::io::{BufRead, BufReader, Read, Write};
use tracing::{debug, trace};

/// Prompt written before every line of input unless overridden.
pub const DEFAULT_PROMPT: &str = "> ";

/// What to do with a line that contains nothing but whitespace.
#[derive(Default)]
pub enum EmptyLine {
    /// Run the last non-empty line again. Does nothing if there is none yet.
    #[default]
    Repeat,
    /// Print nothing.
    Ignore,
    /// Call a custom handler.
    Handler(Box<dyn FnMut() -> Reply>),
}

type DefaultHandler = Box<dyn FnMut(&str, &str) -> Reply>;

/// Default reply for a command name that is not in the table.
///
/// `name` is the first token produced by the tokenizer, `line` the raw input line.
pub fn default_reply(name: &str, _line: &str) -> Reply {
    Reply::ok(format!("unrecognized command: {name}\n"))
}

/// An interactive line-oriented command interpreter.
///
/// The interpreter owns a [`CommandTable`], reads lines from `R` and writes the
/// prompt and command output to `W`. Use [`Interpreter::process_line`] to run a
/// single line or [`Interpreter::repl`] to drive the prompt/read/dispatch loop.
///
/// The tokenizer, the empty-line behaviour and the unknown-command fallback can
/// each be replaced independently.
///
/// Example
/// ```
/// use linecmd::{CommandTable, Interpreter, Reply};
/// use std::io::Cursor;
///
/// let commands = CommandTable::new()
///     .with("hello", |args: &[String]| Reply::ok(format!("Hello, {}\n", args.join(" "))))
///     .unwrap();
///
/// let mut out = Vec::new();
/// let err = Interpreter::new(commands, Cursor::new("hello world\n"), &mut out).repl();
/// assert!(err.is_eof());
/// assert_eq!(out, b"> Hello, world\n> ");
/// ```
pub struct Interpreter<R, W> {
    input: BufReader<R>,
    output: W,
    commands: CommandTable,
    prompt: String,
    last_line: String,
    tokenizer: Tokenizer,
    default: DefaultHandler,
    empty_line: EmptyLine,
}

impl<R: Read, W: Write> Interpreter<R, W> {
    /// Create an interpreter with the default prompt and behaviours.
    pub fn new(commands: CommandTable, input: R, output: W) -> Self {
        Self {
            input: BufReader::new(input),
            output,
            commands,
            prompt: DEFAULT_PROMPT.to_string(),
            last_line: String::new(),
            tokenizer: Box::new(tokenizer::whitespace),
            default: Box::new(default_reply),
            empty_line: EmptyLine::default(),
        }
    }

    /// Replace the prompt written before every read.
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.set_prompt(prompt);
        self
    }

    /// Replace the tokenizer. It receives the trimmed, non-empty line.
    pub fn with_tokenizer<F>(mut self, tokenizer: F) -> Self
    where
        F: Fn(&str) -> Vec<String> + 'static,
    {
        self.tokenizer = Box::new(tokenizer);
        self
    }

    /// Replace the handler for unknown commands. It receives the command name as
    /// tokenized and the raw line.
    pub fn with_default<F>(mut self, default: F) -> Self
    where
        F: FnMut(&str, &str) -> Reply + 'static,
    {
        self.default = Box::new(default);
        self
    }

    /// Replace what happens on a whitespace-only line.
    pub fn with_empty_line(mut self, empty_line: EmptyLine) -> Self {
        self.empty_line = empty_line;
        self
    }

    /// The prompt written before every read.
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Change the prompt between reads.
    pub fn set_prompt(&mut self, prompt: impl Into<String>) {
        self.prompt = prompt.into();
    }

    /// The last line that produced at least one token, exactly as received.
    /// Empty until the first such line.
    pub fn last_line(&self) -> &str {
        &self.last_line
    }

    /// The registered commands.
    pub fn commands(&self) -> &CommandTable {
        &self.commands
    }

    /// Mutable access to the command table, e.g. to register commands between lines.
    pub fn commands_mut(&mut self) -> &mut CommandTable {
        &mut self.commands
    }

    /// Give the streams back. Input buffered but not yet processed is lost.
    pub fn into_parts(self) -> (R, W) {
        (self.input.into_inner(), self.output)
    }

    /// Parse one line of input and run the matching command.
    ///
    /// The command's output, if any, is written to the output stream. Returns the
    /// number of bytes written. [`Error::Handler`] means the command asked to stop;
    /// [`Error::Io`] means the output could not be written.
    pub fn process_line(&mut self, raw_line: &str) -> Result<usize> {
        self.run_line(raw_line, false)
    }

    fn run_line(&mut self, raw_line: &str, repeating: bool) -> Result<usize> {
        let trimmed = raw_line.trim();
        let tokens = if trimmed.is_empty() {
            Vec::new()
        } else {
            (self.tokenizer)(trimmed)
        };

        let Some((name, args)) = tokens.split_first() else {
            // Repeated line no longer tokenizes (tokenizer was replaced).
            if repeating {
                return Ok(0);
            }
            return self.empty_line();
        };

        self.last_line = raw_line.to_owned();

        let reply = match self.commands.get_mut(name) {
            Some(handler) => {
                debug!(command = %name, args = args.len(), "dispatching command");
                handler.call(args)
            }
            None => {
                debug!(command = %name, "unrecognized command");
                (self.default)(name, raw_line)
            }
        };
        self.emit(reply)
    }

    fn empty_line(&mut self) -> Result<usize> {
        match &mut self.empty_line {
            EmptyLine::Handler(handler) => {
                let reply = handler();
                self.emit(reply)
            }
            EmptyLine::Ignore => Ok(0),
            EmptyLine::Repeat => self.repeat_last_line(),
        }
    }

    fn repeat_last_line(&mut self) -> Result<usize> {
        if self.last_line.is_empty() {
            trace!("empty line with nothing to repeat");
            return Ok(0);
        }
        let line = self.last_line.clone();
        trace!(line = %line.trim(), "repeating last line");
        self.run_line(&line, true)
    }

    fn emit(&mut self, reply: Reply) -> Result<usize> {
        let Reply { output, error } = reply;
        if !output.is_empty() {
            self.output.write_all(output.as_bytes())?;
            self.output.flush()?;
        }
        match error {
            Some(e) => Err(Error::Handler(e)),
            None => Ok(output.len()),
        }
    }

    /// Run the interpreter loop.
    ///
    /// For each iteration it writes the prompt, waits for a line of input and
    /// passes it to [`Interpreter::process_line`]. The loop only ends on an error,
    /// which is returned: [`Error::Eof`] when the input is exhausted,
    /// [`Error::Io`] on a read or write failure, [`Error::Handler`] when a command
    /// fails.
    pub fn repl(&mut self) -> Error {
        let mut buf = Vec::new();
        loop {
            if let Err(e) = self.step(&mut buf) {
                if e.is_eof() {
                    debug!("end of input");
                }
                return e;
            }
        }
    }

    fn step(&mut self, buf: &mut Vec<u8>) -> Result<()> {
        self.output.write_all(self.prompt.as_bytes())?;
        self.output.flush()?;

        buf.clear();
        self.input.read_until(b'\n', buf)?;
        // A trailing line without a terminator is dropped, like a clean end of input.
        if !buf.ends_with(b"\n") {
            return Err(Error::Eof);
        }
        let line = String::from_utf8_lossy(buf.as_slice());
        self.process_line(&line)?;
        Ok(())
    }
}
