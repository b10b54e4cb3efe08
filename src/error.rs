use thiserror::Error;

/// Errors returned by the interpreter and the command table.
///
/// Two classes end a session: I/O failures ([`Error::Io`], [`Error::Eof`]) and
/// handler failures ([`Error::Handler`]). The remaining variants are reported
/// while building a [`CommandTable`](crate::CommandTable).
#[derive(Debug, Error)]
pub enum Error {
    /// Reading the input or writing the prompt/output failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The input stream reached its end.
    #[error("end of input")]
    Eof,

    /// A command handler, the default handler or the empty-line handler failed.
    #[error("command failed: {0}")]
    Handler(#[source] anyhow::Error),

    /// The command name is empty or contains whitespace.
    #[error("invalid command name: {0:?}")]
    InvalidCommandName(String),

    /// A handler is already registered under this name.
    #[error("duplicate command: {0}")]
    DuplicateCommand(String),
}

impl Error {
    /// True if the session ended because the input was exhausted.
    pub fn is_eof(&self) -> bool {
        matches!(self, Error::Eof)
    }

    /// True if the session ended because a handler returned an error.
    pub fn is_handler(&self) -> bool {
        matches!(self, Error::Handler(_))
    }
}

/// Convenience Result type for this crate.
pub type Result<T> = std::result::Result<T, Error>;
