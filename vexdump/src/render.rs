//! Token output — trait-based format dispatch.

use anyhow::{Context, Result};
use std::fmt::Write;
use vex::{Parser, Token};

/// Trait for rendering the tokens of a parser into an output format.
pub trait Renderer {
    fn render(&self, parser: &Parser) -> Result<String>;
}

/// Create a renderer for the requested format.
pub fn create_renderer(json: bool) -> Box<dyn Renderer> {
    if json {
        Box::new(JsonRenderer)
    } else {
        Box::new(TextRenderer)
    }
}

/// One line per token: `-c/--count integer: 42`.
pub struct TextRenderer;

impl Renderer for TextRenderer {
    fn render(&self, parser: &Parser) -> Result<String> {
        let mut out = String::new();
        for token in parser {
            let _ = write!(out, "{} {}", token_label(token), token.kind);
            if !token.values.is_empty() {
                let values: Vec<String> = token.values.iter().map(|v| v.to_string()).collect();
                let _ = write!(out, ": {}", values.join(" "));
            }
            out.push('\n');
        }
        Ok(out)
    }
}

/// Pretty-printed JSON array of tokens.
pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn render(&self, parser: &Parser) -> Result<String> {
        let mut out =
            serde_json::to_string_pretty(parser.tokens()).context("failed to encode tokens")?;
        out.push('\n');
        Ok(out)
    }
}

/// `-c/--count`, `-q`, `--count`, or `(value)` for free-standing values.
fn token_label(token: &Token) -> String {
    match (token.short_name, token.long_name.as_deref()) {
        (Some(short), Some(long)) => format!("-{}/--{}", short, long),
        (Some(short), None) => format!("-{}", short),
        (None, Some(long)) => format!("--{}", long),
        (None, None) => "(value)".to_string(),
    }
}
