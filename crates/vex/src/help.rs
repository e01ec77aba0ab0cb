//! Usage/help text rendering.

use crate::registry::{OptionDesc, Registry};
use std::fmt::Write;

/// Render the help text for a parser.
///
/// ```text
/// Usage: prog [-h/--help] [-v/--version] [-c/--count] ...
///
/// Description:
/// Counts things.
///
/// Arguments:
///  -h, --help     Print this help message
///  -v, --version  Print the version string
///  -c, --count    How many
/// ```
pub(crate) fn render(name: &str, description: Option<&str>, registry: &Registry) -> String {
    let mut out = String::new();

    // Usage line
    let _ = write!(out, "Usage: {}", name);
    for desc in registry.iter() {
        let _ = write!(out, " [{}]", usage_label(desc));
        if desc.takes_values() {
            out.push_str(" ...");
        }
    }
    out.push_str("\n\n");

    if let Some(description) = description {
        let _ = writeln!(out, "Description:");
        let _ = writeln!(out, "{}", description);
        out.push('\n');
    }

    // Arguments section, descriptions aligned on a common column
    let labels: Vec<String> = registry.iter().map(argument_label).collect();
    let width = labels.iter().map(|l| l.len()).max().unwrap_or(0);

    let _ = writeln!(out, "Arguments:");
    for (desc, label) in registry.iter().zip(&labels) {
        if desc.description.is_empty() {
            let _ = writeln!(out, " {}", label);
        } else {
            let _ = writeln!(out, " {:width$}  {}", label, desc.description, width = width);
        }
    }

    out
}

/// `-c/--count`, or `-c` for short-only options.
fn usage_label(desc: &OptionDesc) -> String {
    match desc.long_name {
        Some(ref long) => format!("-{}/--{}", desc.short_name, long),
        None => format!("-{}", desc.short_name),
    }
}

/// `-c, --count`, or `-c` for short-only options.
fn argument_label(desc: &OptionDesc) -> String {
    match desc.long_name {
        Some(ref long) => format!("-{}, --{}", desc.short_name, long),
        None => format!("-{}", desc.short_name),
    }
}
