use crate::error::{Error, Result};
use std::collections::HashMap;

/// The result of running one command: text to print plus an optional error.
///
/// The output is written to the console even when `error` is set. A non-empty
/// `error` stops the interpreter loop.
#[derive(Debug, Default)]
pub struct Reply {
    /// Text written verbatim to the output stream. May be empty.
    pub output: String,
    /// Set when the command failed; ends the session.
    pub error: Option<anyhow::Error>,
}

impl Reply {
    /// Successful reply with the given output.
    pub fn ok(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            error: None,
        }
    }

    /// Failed reply. `output` is still printed before the loop stops.
    pub fn fail(output: impl Into<String>, error: impl Into<anyhow::Error>) -> Self {
        Self {
            output: output.into(),
            error: Some(error.into()),
        }
    }

    /// No output, no error.
    pub fn empty() -> Self {
        Self::default()
    }
}

impl From<String> for Reply {
    fn from(output: String) -> Self {
        Reply::ok(output)
    }
}

impl From<&str> for Reply {
    fn from(output: &str) -> Self {
        Reply::ok(output)
    }
}

impl From<anyhow::Result<String>> for Reply {
    fn from(res: anyhow::Result<String>) -> Self {
        match res {
            Ok(output) => Reply::ok(output),
            Err(e) => Reply {
                output: String::new(),
                error: Some(e),
            },
        }
    }
}

/// Object-safe trait for anything that can run a command.
///
/// A blanket implementation exists for every `FnMut(&[String]) -> Reply`, so plain
/// closures and functions can be registered directly. Handlers get only their
/// arguments; any shared state must be captured when the handler is built.
pub trait CommandHandler {
    /// Run the command with the arguments that followed its name.
    fn call(&mut self, args: &[String]) -> Reply;
}

impl<F: FnMut(&[String]) -> Reply> CommandHandler for F {
    fn call(&mut self, args: &[String]) -> Reply {
        self(args)
    }
}

/// Mapping from command name to handler.
///
/// Names are case-sensitive, non-empty and may not contain whitespace.
/// Lookup is exact-match only.
#[derive(Default)]
pub struct CommandTable {
    handlers: HashMap<String, Box<dyn CommandHandler>>,
}

impl CommandTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` under `name`.
    ///
    /// Fails with [`Error::InvalidCommandName`] for empty names or names with
    /// whitespace, and with [`Error::DuplicateCommand`] if the name is taken.
    pub fn register<H>(&mut self, name: impl Into<String>, handler: H) -> Result<()>
    where
        H: CommandHandler + 'static,
    {
        let name = name.into();
        if name.is_empty() || name.chars().any(char::is_whitespace) {
            return Err(Error::InvalidCommandName(name));
        }
        if self.handlers.contains_key(&name) {
            return Err(Error::DuplicateCommand(name));
        }
        self.handlers.insert(name, Box::new(handler));
        Ok(())
    }

    /// Builder form of [`CommandTable::register`].
    pub fn with<H>(mut self, name: impl Into<String>, handler: H) -> Result<Self>
    where
        H: CommandHandler + 'static,
    {
        self.register(name, handler)?;
        Ok(self)
    }

    /// Remove a command, returning its handler if it was registered.
    pub fn remove(&mut self, name: &str) -> Option<Box<dyn CommandHandler>> {
        self.handlers.remove(name)
    }

    /// True if a handler is registered under exactly this name.
    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut Box<dyn CommandHandler>> {
        self.handlers.get_mut(name)
    }

    /// Registered command names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of registered commands.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// True if no command is registered.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl std::fmt::Debug for CommandTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.names()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn echo(args: &[String]) -> Reply {
        Reply::ok(args.join(" "))
    }

    #[test]
    fn test_register_and_call() {
        let mut table = CommandTable::new().with("echo", echo).unwrap();
        assert!(table.contains("echo"));
        assert!(!table.contains("Echo"));

        let handler = table.get_mut("echo").unwrap();
        let reply = handler.call(&["a".to_string(), "b".to_string()]);
        assert_eq!(reply.output, "a b");
        assert!(reply.error.is_none());
    }

    #[test]
    fn test_register_rejects_bad_names() {
        let mut table = CommandTable::new();
        assert!(matches!(
            table.register("", echo),
            Err(Error::InvalidCommandName(_))
        ));
        assert!(matches!(
            table.register("two words", echo),
            Err(Error::InvalidCommandName(_))
        ));
        assert!(matches!(
            table.register("tab\there", echo),
            Err(Error::InvalidCommandName(_))
        ));
        assert!(table.is_empty());
    }

    #[test]
    fn test_register_rejects_duplicates() {
        let mut table = CommandTable::new().with("echo", echo).unwrap();
        let err = table.register("echo", echo).unwrap_err();
        assert!(matches!(err, Error::DuplicateCommand(ref n) if n == "echo"));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_names_are_sorted() {
        let mut table = CommandTable::new()
            .with("zeta", echo)
            .unwrap()
            .with("alpha", echo)
            .unwrap();
        assert_eq!(table.names(), vec!["alpha", "zeta"]);

        assert!(table.remove("zeta").is_some());
        assert!(table.remove("zeta").is_none());
        assert_eq!(table.names(), vec!["alpha"]);
    }

    #[test]
    fn test_stateful_handler() {
        let mut count = 0;
        let counter = move |_: &[String]| {
            count += 1;
            Reply::ok(format!("{count}\n"))
        };
        let mut table = CommandTable::new().with("count", counter).unwrap();
        let handler = table.get_mut("count").unwrap();
        assert_eq!(handler.call(&[]).output, "1\n");
        assert_eq!(handler.call(&[]).output, "2\n");
    }

    #[test]
    fn test_reply_from_text() {
        let owned: Reply = format!("{}\n", 42).into();
        assert_eq!(owned.output, "42\n");
        assert!(owned.error.is_none());

        let borrowed: Reply = "hi\n".into();
        assert_eq!(borrowed.output, "hi\n");
        assert!(borrowed.error.is_none());

        let empty = Reply::empty();
        assert!(empty.output.is_empty());
        assert!(empty.error.is_none());
    }

    #[test]
    fn test_reply_from_result() {
        let ok: Reply = anyhow::Ok("fine".to_string()).into();
        assert_eq!(ok.output, "fine");
        assert!(ok.error.is_none());

        let err: Reply = Err::<String, _>(anyhow::anyhow!("oops")).into();
        assert!(err.output.is_empty());
        assert_eq!(err.error.unwrap().to_string(), "oops");
    }
}
