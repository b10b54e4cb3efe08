//! Line tokenizers.
//!
//! A tokenizer turns one trimmed input line into the command name followed by its
//! arguments. The interpreter never calls a tokenizer with an empty line. A
//! tokenizer that returns no tokens makes the line count as empty.

use regex::Regex;

/// Boxed tokenizer as stored by the interpreter.
pub type Tokenizer = Box<dyn Fn(&str) -> Vec<String>>;

/// Split on runs of whitespace. Never yields empty tokens.
pub fn whitespace(line: &str) -> Vec<String> {
    line.split_whitespace().map(str::to_owned).collect()
}

/// Split on every match of `delimiter`, dropping empty pieces.
///
/// ```
/// use linecmd::tokenizer::split_on;
/// use regex::Regex;
///
/// let tokenize = split_on(Regex::new(r"[,\s]+").unwrap());
/// assert_eq!(tokenize("add 1,2"), vec!["add", "1", "2"]);
/// ```
pub fn split_on(delimiter: Regex) -> Tokenizer {
    Box::new(move |line: &str| {
        delimiter
            .split(line)
            .filter(|piece| !piece.is_empty())
            .map(str::to_owned)
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whitespace_collapses_runs() {
        assert_eq!(whitespace("good  arg1\targ2 "), vec!["good", "arg1", "arg2"]);
        assert!(whitespace(" \t ").is_empty());
    }

    #[test]
    fn test_split_on_custom_delimiter() {
        let tokenize = split_on(Regex::new(r"\s*;\s*").unwrap());
        assert_eq!(tokenize("set;a b ; c"), vec!["set", "a b", "c"]);
        assert!(tokenize(";;").is_empty());
    }
}
