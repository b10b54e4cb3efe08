//! A tiny, embeddable line-oriented command interpreter.
//!
//! This crate reads lines of text from any [`std::io::Read`], splits each line into
//! tokens, dispatches the first token to a registered handler and writes the
//! handler's output to any [`std::io::Write`]. It is meant for building small
//! interactive consoles, on a local terminal or over a socket, with very little
//! boilerplate.
//!
//! The main entry point is [`Interpreter`]. Commands are registered in a
//! [`CommandTable`]; the public modules [`command`], [`tokenizer`] and
//! [`io_adapters`] expose the handler trait, the tokenizers and helpers for
//! capturing output.
//!
//! ```
//! use linecmd::{CommandTable, Interpreter, Reply};
//!
//! let commands = CommandTable::new()
//!     .with("good", |args: &[String]| Reply::ok(format!("good [{}]\n", args.join(" "))))
//!     .unwrap();
//!
//! let mut out = Vec::new();
//! let mut cmd = Interpreter::new(commands, std::io::empty(), &mut out);
//! cmd.process_line("good arg1 arg2").unwrap();
//! drop(cmd);
//! assert_eq!(out, b"good [arg1 arg2]\n");
//! ```

pub mod command;
mod error;
mod interpreter;
pub mod io_adapters;
pub mod tokenizer;

pub use command::{CommandHandler, CommandTable, Reply};
pub use error::{Error, Result};

/// Just a convenient re-export of the interactive command runner.
///
/// See [`Interpreter`] for the high-level API.
pub use interpreter::{DEFAULT_PROMPT, EmptyLine, Interpreter, default_reply};
