//! vex — small command-line argument parser.
//!
//! Declare options on a [`Parser`], hand it the argument vector, then read
//! back the ordered [`Token`]s: one per option occurrence and one per
//! free-standing value, each carrying typed [`Value`]s.
//!
//! ```
//! use vex::{OptionDesc, Parser, Value, ValueKind};
//!
//! let mut parser = Parser::new("prog", "1.0.0").with_description("Counts things.");
//! parser
//!     .register(OptionDesc::new('c', "count", ValueKind::Integer).description("How many"))
//!     .unwrap();
//! parser
//!     .register(OptionDesc::new('i', "input", ValueKind::String).unbounded())
//!     .unwrap();
//!
//! parser.parse(["prog", "--count=3", "-i", "a.txt", "b.txt"]).unwrap();
//!
//! assert_eq!(parser.token_count(), 2);
//! assert_eq!(parser.get_token(0).unwrap().values, vec![Value::Integer(3)]);
//! assert_eq!(parser.values_of("input").count(), 2);
//! assert!(!parser.arg_found("help"));
//! ```
//!
//! `-h/--help` and `-v/--version` are registered on every parser. The
//! library never prints or exits; check [`Parser::arg_found`] and act on it.

mod error;
mod help;
mod parse;
mod registry;
mod value;

pub use error::{Error, Result, Status};
pub use parse::Token;
pub use registry::{LongMatch, OptionDesc};
pub use value::{classify, Value, ValueKind};

use registry::Registry;
use std::cell::OnceCell;

/// Option registry plus the tokens of the most recent parse.
#[derive(Debug)]
pub struct Parser {
    name: String,
    version: String,
    description: Option<String>,
    long_match: LongMatch,
    registry: Registry,
    tokens: Vec<Token>,
    error: Option<Error>,
    help: OnceCell<String>,
}

impl Parser {
    /// New parser with the default `-h/--help` and `-v/--version` flags.
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Parser {
            name: name.into(),
            version: version.into(),
            description: None,
            long_match: LongMatch::default(),
            registry: Registry::with_defaults(),
            tokens: Vec::new(),
            error: None,
            help: OnceCell::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self.help.take();
        self
    }

    pub fn with_long_match(mut self, long_match: LongMatch) -> Self {
        self.long_match = long_match;
        self
    }

    /// Add an option. Fails on an invalid or duplicate short/long name.
    pub fn register(&mut self, desc: OptionDesc) -> Result<()> {
        self.error = None;
        let result = self.registry.register(desc);
        if let Err(ref e) = result {
            tracing::debug!(error = %e, "option rejected");
            self.error = Some(e.clone());
        } else {
            self.help.take();
        }
        result
    }

    /// Tokenize `args`; element 0 is the program name and is skipped.
    ///
    /// Tokens from any previous call are discarded first. On failure the
    /// token list stays empty and the error is recorded in [`Parser::status`].
    pub fn parse<I, S>(&mut self, args: I) -> Result<&[Token]>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.error = None;
        self.tokens = Vec::new();
        match parse::tokenize(&self.registry, self.long_match, args) {
            Ok(tokens) => {
                tracing::debug!(tokens = tokens.len(), "parsed arguments");
                self.tokens = tokens;
                Ok(&self.tokens)
            }
            Err(e) => {
                tracing::debug!(error = %e, "parse failed");
                self.error = Some(e.clone());
                Err(e)
            }
        }
    }

    // -- Accessors ------------------------------------------------------------

    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    pub fn get_token(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }

    /// Whether any token matches `name`: a one-character name is compared
    /// with short names, anything longer with long names.
    pub fn arg_found(&self, name: &str) -> bool {
        self.tokens.iter().any(|t| t.matches(name))
    }

    /// Values of every occurrence of the named option, in order.
    pub fn values_of<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Value> + 'a {
        self.tokens
            .iter()
            .filter(move |t| t.matches(name))
            .flat_map(|t| t.values.iter())
    }

    /// Values of tokens that did not come from an option.
    pub fn free_values(&self) -> impl Iterator<Item = &Value> {
        self.tokens
            .iter()
            .filter(|t| t.is_free())
            .flat_map(|t| t.values.iter())
    }

    /// Registered options in declaration order.
    pub fn options(&self) -> impl Iterator<Item = &OptionDesc> {
        self.registry.iter()
    }

    /// Descriptor a token came from.
    pub fn option_of(&self, token: &Token) -> Option<&OptionDesc> {
        token.option_index().and_then(|i| self.registry.get(i))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn long_match(&self) -> LongMatch {
        self.long_match
    }

    /// Outcome of the last `register` or `parse` call.
    pub fn status(&self) -> Status {
        self.error.as_ref().map_or(Status::Ok, Error::status)
    }

    pub fn status_message(&self) -> Option<&str> {
        self.error.as_ref().and_then(Error::message)
    }

    // -- Text -----------------------------------------------------------------

    pub fn get_version(&self) -> &str {
        &self.version
    }

    /// Help text; rendered once and reused until an option is registered.
    pub fn get_help(&self) -> &str {
        self.help.get_or_init(|| {
            help::render(&self.name, self.description.as_deref(), &self.registry)
        })
    }
}

impl<'a> IntoIterator for &'a Parser {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> Parser {
        let mut p = Parser::new("prog", "2.1.0");
        p.register(OptionDesc::flag('a', "all")).unwrap();
        p.register(OptionDesc::flag('b', "brief")).unwrap();
        p.register(OptionDesc::new('c', "count", ValueKind::Integer)).unwrap();
        p.register(OptionDesc::new('i', "input", ValueKind::String).unbounded())
            .unwrap();
        p
    }

    #[test]
    fn default_options_are_registered() {
        let p = Parser::new("prog", "1.0");
        let shorts: Vec<char> = p.options().map(|d| d.short_name).collect();
        assert_eq!(shorts, vec!['h', 'v']);
    }

    #[test]
    fn default_names_cannot_be_reused() {
        let mut p = Parser::new("prog", "1.0");
        assert!(p.register(OptionDesc::flag('h', "hosts")).is_err());
        assert!(p.register(OptionDesc::flag('x', "version")).is_err());
        assert_eq!(p.status(), Status::InvalidValue);
    }

    #[test]
    fn duplicates_fail_in_either_order() {
        let pairs = [
            (OptionDesc::flag('x', "extra"), OptionDesc::flag('x', "other")),
            (OptionDesc::flag('x', "other"), OptionDesc::flag('y', "other")),
        ];
        for (a, b) in pairs {
            for (first, second) in [(a.clone(), b.clone()), (b, a)] {
                let mut p = Parser::new("prog", "1.0");
                p.register(first).unwrap();
                assert!(matches!(p.register(second), Err(Error::InvalidValue(_))));
            }
        }
    }

    #[test]
    fn long_value_round_trips() {
        let mut p = parser();
        p.parse(["prog", "--count=42"]).unwrap();
        assert_eq!(p.token_count(), 1);
        let token = p.get_token(0).unwrap();
        assert_eq!(token.kind, ValueKind::Integer);
        assert_eq!(token.values, vec![Value::Integer(42)]);
    }

    #[test]
    fn unknown_in_cluster_fails() {
        let mut p = parser();
        let err = p.parse(["prog", "-abz"]).unwrap_err();
        assert!(matches!(err, Error::UnknownArgument(_)));
        assert_eq!(p.status(), Status::UnknownArgument);
        assert_eq!(p.status_message(), Some("unknown option: -z"));
    }

    #[test]
    fn short_option_takes_next_argument() {
        let mut p = parser();
        p.parse(["prog", "-i", "file.txt"]).unwrap();
        assert_eq!(p.token_count(), 1);
        assert_eq!(p.get_token(0).unwrap().value().and_then(Value::as_str), Some("file.txt"));
    }

    #[test]
    fn double_dash_keeps_option_text_as_value() {
        let mut p = parser();
        p.parse(["prog", "--", "-a"]).unwrap();
        assert!(!p.arg_found("a"));
        assert_eq!(p.free_values().next().and_then(Value::as_str), Some("-a"));
    }

    #[test]
    fn registration_alone_creates_no_tokens() {
        let p = Parser::new("prog", "1.0");
        assert!(!p.arg_found("h"));
        assert!(!p.arg_found("help"));
        assert_eq!(p.token_count(), 0);
    }

    #[test]
    fn arg_found_by_short_and_long_name() {
        let mut p = parser();
        p.parse(["prog", "-h"]).unwrap();
        assert!(p.arg_found("h"));
        assert!(p.arg_found("help"));
        assert!(!p.arg_found("version"));
    }

    #[test]
    fn second_parse_replaces_tokens() {
        let mut p = parser();
        p.parse(["prog", "-a", "-b", "--count=1"]).unwrap();
        assert_eq!(p.token_count(), 3);
        p.parse(["prog", "-a"]).unwrap();
        assert_eq!(p.token_count(), 1);
        assert!(!p.arg_found("count"));
    }

    #[test]
    fn failed_parse_leaves_no_tokens() {
        let mut p = parser();
        p.parse(["prog", "-a"]).unwrap();
        assert!(p.parse(["prog", "-b", "--nope"]).is_err());
        assert_eq!(p.token_count(), 0);
        assert_eq!(p.status(), Status::UnknownArgument);

        p.parse(["prog"]).unwrap();
        assert_eq!(p.status(), Status::Ok);
        assert_eq!(p.status_message(), None);
    }

    #[test]
    fn get_token_out_of_range() {
        let mut p = parser();
        p.parse(["prog", "-a"]).unwrap();
        assert!(p.get_token(1).is_none());
    }

    #[test]
    fn values_of_collects_across_occurrences() {
        let mut p = parser();
        p.parse(["prog", "-i", "a", "b", "-a", "--input=c"]).unwrap();
        let values: Vec<_> = p.values_of("i").filter_map(Value::as_str).collect();
        assert_eq!(values, vec!["a", "b", "c"]);
    }

    #[test]
    fn iterates_in_order() {
        let mut p = parser();
        p.parse(["prog", "-a", "-b", "5"]).unwrap();
        let kinds: Vec<_> = (&p).into_iter().map(|t| t.kind).collect();
        assert_eq!(kinds, vec![ValueKind::Flag, ValueKind::Flag, ValueKind::Integer]);
        assert_eq!(p.iter().last().map(Token::is_free), Some(true));
        assert_eq!(p.iter().len(), 3);
    }

    #[test]
    fn option_of_token() {
        let mut p = parser();
        p.parse(["prog", "--count=2", "x"]).unwrap();
        assert_eq!(p.option_of(&p.tokens()[0]).map(|d| d.short_name), Some('c'));
        assert!(p.option_of(&p.tokens()[1]).is_none());
    }

    #[test]
    fn prefix_mode_is_opt_in() {
        let mut exact = parser();
        assert!(exact.parse(["prog", "--helper"]).is_err());

        let mut prefix = Parser::new("prog", "1.0").with_long_match(LongMatch::Prefix);
        prefix.parse(["prog", "--helper"]).unwrap();
        assert!(prefix.arg_found("help"));
    }

    #[test]
    fn help_is_rerendered_after_registration() {
        let mut p = Parser::new("prog", "1.0");
        assert!(!p.get_help().contains("--count"));
        p.register(OptionDesc::new('c', "count", ValueKind::Integer)).unwrap();
        assert!(p.get_help().contains("--count"));
    }

    #[test]
    fn rejected_registration_keeps_help() {
        let mut p = Parser::new("prog", "1.0");
        let before = p.get_help().to_string();
        assert!(p.register(OptionDesc::flag('1', "one")).is_err());
        assert_eq!(p.get_help(), before);
    }

    #[test]
    fn later_error_replaces_earlier_one() {
        let mut p = Parser::new("prog", "1.0");
        assert!(p.register(OptionDesc::flag('1', "one")).is_err());
        assert_eq!(p.status(), Status::InvalidValue);

        assert!(p.parse(["prog", "--nope"]).is_err());
        assert_eq!(p.status(), Status::UnknownArgument);
        assert_eq!(p.status_message(), Some("unknown option: --nope"));
    }

    #[test]
    fn version_is_verbatim() {
        let p = Parser::new("prog", "2.1.0-rc1");
        assert_eq!(p.get_version(), "2.1.0-rc1");
    }

    #[test]
    fn help_starts_with_usage() {
        let p = Parser::new("prog", "1.0").with_description("Does things.");
        assert!(p.get_help().starts_with("Usage: prog [-h/--help] [-v/--version]\n\n"));
        assert!(p.get_help().contains("Description:\nDoes things.\n"));
    }
}
