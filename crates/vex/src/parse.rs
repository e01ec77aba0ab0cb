//! Tokenizer: walks the argument vector against the registry.
//!
//! Single left-to-right pass. The only carried state besides the output is
//! the "last token": the most recent option occurrence, which free-standing
//! values and unmatched cluster characters attach to. It is cleared by every
//! new option argument and by every free value that starts its own token.

use crate::error::{Error, Result};
use crate::registry::{LongMatch, OptionDesc, Registry};
use crate::value::{self, Value, ValueKind};

#[cfg(feature = "serde")]
use serde::Serialize;

/// One matched option occurrence, or one free-standing value.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Token {
    pub long_name: Option<String>,
    pub short_name: Option<char>,
    pub kind: ValueKind,
    pub values: Vec<Value>,
    #[cfg_attr(feature = "serde", serde(skip))]
    option: Option<usize>,
}

impl Token {
    fn for_option(index: usize, desc: &OptionDesc) -> Self {
        Token {
            long_name: desc.long_name.clone(),
            short_name: Some(desc.short_name),
            kind: desc.kind,
            values: Vec::new(),
            option: Some(index),
        }
    }

    fn free(value: Value) -> Self {
        Token {
            long_name: None,
            short_name: None,
            kind: value.kind(),
            values: vec![value],
            option: None,
        }
    }

    /// Registry position of the option this token came from; `None` for
    /// free-standing values.
    pub fn option_index(&self) -> Option<usize> {
        self.option
    }

    pub fn is_free(&self) -> bool {
        self.option.is_none()
    }

    pub fn value(&self) -> Option<&Value> {
        self.values.first()
    }

    /// One-character names match the short name, longer names the long name.
    pub fn matches(&self, name: &str) -> bool {
        let mut chars = name.chars();
        match (chars.next(), chars.next()) {
            (None, _) => false,
            (Some(c), None) => self.short_name == Some(c),
            _ => self.long_name.as_deref() == Some(name),
        }
    }
}

/// Tokenize `args` (element 0 is the program name and is skipped).
pub(crate) fn tokenize<I, S>(registry: &Registry, mode: LongMatch, args: I) -> Result<Vec<Token>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut tokenizer = Tokenizer {
        registry,
        mode,
        tokens: Vec::new(),
        last: None,
        options_enabled: true,
    };
    for arg in args.into_iter().skip(1) {
        tokenizer.arg(arg.as_ref())?;
    }
    Ok(tokenizer.tokens)
}

struct Tokenizer<'a> {
    registry: &'a Registry,
    mode: LongMatch,
    tokens: Vec<Token>,
    /// Index into `tokens` of the last option occurrence.
    last: Option<usize>,
    options_enabled: bool,
}

impl Tokenizer<'_> {
    fn arg(&mut self, arg: &str) -> Result<()> {
        tracing::trace!(arg, options = self.options_enabled, "tokenize");

        if !self.options_enabled || arg.len() < 2 || !arg.starts_with('-') {
            return self.free(arg);
        }

        if arg == "--" {
            self.options_enabled = false;
            return Ok(());
        }

        self.last = None;
        match arg.strip_prefix("--") {
            Some(body) => self.long(body),
            None => self.cluster(&arg[1..]),
        }
    }

    /// `--name` or `--name=value`.
    fn long(&mut self, body: &str) -> Result<()> {
        let (name, value) = match body.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (body, None),
        };

        let registry = self.registry;
        let index = registry
            .find_long(name, self.mode)
            .ok_or_else(|| Error::unknown(format!("unknown option: --{}", name)))?;
        let desc = &registry[index];

        let mut token = Token::for_option(index, desc);
        if let Some(text) = value {
            if desc.kind == ValueKind::Flag {
                tracing::debug!(
                    option = %desc.display_name(),
                    value = text,
                    "ignoring value given to flag"
                );
            } else {
                append(&mut token, desc, text)?;
            }
        }
        self.push(token)?;
        self.last = Some(self.tokens.len() - 1);
        Ok(())
    }

    /// `-abc`, `-ifile.txt`.
    fn cluster(&mut self, body: &str) -> Result<()> {
        let registry = self.registry;
        for (offset, c) in body.char_indices() {
            if let Some(index) = registry.find_short(c) {
                self.push(Token::for_option(index, &registry[index]))?;
                self.last = Some(self.tokens.len() - 1);
                continue;
            }

            // The rest of the cluster may be a value for the previous option
            let target = self.last.and_then(|t| {
                let option = self.tokens[t].option?;
                (registry[option].kind != ValueKind::Flag).then_some((t, option))
            });
            return match target {
                Some((t, option)) => {
                    append(&mut self.tokens[t], &registry[option], &body[offset..])
                }
                None => Err(Error::unknown(format!("unknown option: -{}", c))),
            };
        }
        Ok(())
    }

    /// Argument not introduced by `-`, or anything after `--`.
    fn free(&mut self, arg: &str) -> Result<()> {
        let kind = value::classify(arg);

        if self.options_enabled {
            if let Some((t, option)) = self.open_last() {
                let desc = &self.registry[option];
                if self.tokens[t].kind != kind {
                    return Err(Error::invalid(format!(
                        "unexpected {} value for {}: {}",
                        kind,
                        desc.display_name(),
                        arg
                    )));
                }
                return append(&mut self.tokens[t], desc, arg);
            }
        }

        let value = value::convert(kind, arg)?;
        self.push(Token::free(value))?;
        self.last = None;
        Ok(())
    }

    /// Last option token, if it can still take a value.
    fn open_last(&self) -> Option<(usize, usize)> {
        let t = self.last?;
        let token = &self.tokens[t];
        let option = token.option?;
        self.registry[option]
            .has_capacity(token.values.len())
            .then_some((t, option))
    }

    fn push(&mut self, token: Token) -> Result<()> {
        self.tokens.try_reserve(1)?;
        self.tokens.push(token);
        Ok(())
    }
}

/// Convert `text` to the option's type and add it to the token.
fn append(token: &mut Token, desc: &OptionDesc, text: &str) -> Result<()> {
    if !desc.has_capacity(token.values.len()) {
        return Err(Error::invalid(format!(
            "too many values for {}: {}",
            desc.display_name(),
            text
        )));
    }
    let value = value::convert(desc.kind, text)?;
    token.values.try_reserve(1)?;
    token.values.push(value);
    Ok(())
}
