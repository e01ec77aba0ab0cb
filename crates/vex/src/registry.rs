//! Option descriptors and the ordered registry that holds them.

use crate::error::{Error, Result};
use crate::value::ValueKind;

#[cfg(feature = "serde")]
use serde::Deserialize;

/// Declared shape of one option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionDesc {
    pub long_name: Option<String>,
    pub short_name: char,
    pub kind: ValueKind,
    pub description: String,
    /// Values one occurrence may accumulate; `None` is unbounded.
    pub max_count: Option<usize>,
}

impl OptionDesc {
    /// Option with both a short and a long name. Valued kinds accept one
    /// value by default; flags accept none.
    pub fn new(short_name: char, long_name: impl Into<String>, kind: ValueKind) -> Self {
        OptionDesc {
            long_name: Some(long_name.into()),
            ..Self::short_only(short_name, kind)
        }
    }

    /// Option reachable only through its short name.
    pub fn short_only(short_name: char, kind: ValueKind) -> Self {
        let max_count = match kind {
            ValueKind::Flag => Some(0),
            _ => Some(1),
        };
        OptionDesc {
            long_name: None,
            short_name,
            kind,
            description: String::new(),
            max_count,
        }
    }

    pub fn flag(short_name: char, long_name: impl Into<String>) -> Self {
        Self::new(short_name, long_name, ValueKind::Flag)
    }

    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.description = text.into();
        self
    }

    pub fn max_count(mut self, count: usize) -> Self {
        self.max_count = Some(count);
        self
    }

    pub fn unbounded(mut self) -> Self {
        self.max_count = None;
        self
    }

    /// Whether help text should advertise trailing values (`...`).
    pub fn takes_values(&self) -> bool {
        self.kind != ValueKind::Flag && self.max_count != Some(0)
    }

    /// Whether an occurrence already holding `count` values can take another.
    pub fn has_capacity(&self, count: usize) -> bool {
        if self.kind == ValueKind::Flag {
            return false;
        }
        match self.max_count {
            None => true,
            Some(max) => count < max,
        }
    }

    /// `-c` / `--count` label used in messages.
    pub fn display_name(&self) -> String {
        match self.long_name {
            Some(ref long) => format!("--{}", long),
            None => format!("-{}", self.short_name),
        }
    }
}

/// How `--name` is matched against registered long names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Deserialize), serde(rename_all = "lowercase"))]
pub enum LongMatch {
    /// Supplied name must equal the registered name.
    #[default]
    Exact,
    /// Only as many characters as the registered name are compared, so
    /// `--helper` matches `help`. First registered match wins.
    Prefix,
}

impl LongMatch {
    fn matches(self, registered: &str, supplied: &str) -> bool {
        match self {
            LongMatch::Exact => registered == supplied,
            LongMatch::Prefix => supplied.starts_with(registered),
        }
    }
}

/// Registered options in declaration order.
#[derive(Debug, Default)]
pub(crate) struct Registry {
    options: Vec<OptionDesc>,
}

impl Registry {
    /// Registry holding the built-in `-h/--help` and `-v/--version` flags.
    pub fn with_defaults() -> Self {
        Registry {
            options: vec![
                OptionDesc::flag('h', "help").description("Print this help message"),
                OptionDesc::flag('v', "version").description("Print the version string"),
            ],
        }
    }

    /// Validate and append a descriptor.
    pub fn register(&mut self, desc: OptionDesc) -> Result<()> {
        if !desc.short_name.is_ascii_alphabetic() {
            return Err(Error::invalid(format!(
                "invalid short option name: {:?}",
                desc.short_name
            )));
        }

        if let Some(ref long) = desc.long_name {
            if long.is_empty() {
                return Err(Error::invalid("empty long option name"));
            }
            // `arg_found` treats one-character names as short names
            if long.chars().count() == 1 {
                return Err(Error::invalid(format!(
                    "long option name must be longer than one character: --{}",
                    long
                )));
            }
            if long.starts_with('-') || long.contains('=') {
                return Err(Error::invalid(format!("invalid long option name: --{}", long)));
            }
        }

        for existing in &self.options {
            if existing.short_name == desc.short_name {
                return Err(Error::invalid(format!(
                    "duplicate option: -{}",
                    desc.short_name
                )));
            }
            if existing.long_name.is_some() && existing.long_name == desc.long_name {
                return Err(Error::invalid(format!(
                    "duplicate option: {}",
                    desc.display_name()
                )));
            }
        }

        self.options.try_reserve(1)?;
        tracing::debug!(
            short = %desc.short_name,
            long = desc.long_name.as_deref().unwrap_or(""),
            kind = %desc.kind,
            "registered option"
        );
        self.options.push(desc);
        Ok(())
    }

    pub fn get(&self, index: usize) -> Option<&OptionDesc> {
        self.options.get(index)
    }

    pub fn find_short(&self, short: char) -> Option<usize> {
        self.options.iter().position(|d| d.short_name == short)
    }

    pub fn find_long(&self, name: &str, mode: LongMatch) -> Option<usize> {
        self.options.iter().position(|d| {
            d.long_name
                .as_deref()
                .is_some_and(|long| mode.matches(long, name))
        })
    }

    pub fn iter(&self) -> std::slice::Iter<'_, OptionDesc> {
        self.options.iter()
    }
}

impl std::ops::Index<usize> for Registry {
    type Output = OptionDesc;

    fn index(&self, index: usize) -> &OptionDesc {
        &self.options[index]
    }
}
