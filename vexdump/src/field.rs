//! Parse argsh-style field declarations into option descriptors.
//!
//! ```text
//! count|c:~int=How many       integer, one value
//! input|i:~string...          string, unbounded
//! ratio|r:~float2             float, up to two values
//! verbose|v:+=Talk more       flag
//! |q:+                        short-only flag
//! name|n                      string, one value (default type)
//! ```

use regex::Regex;
use std::sync::LazyLock;
use vex::{OptionDesc, ValueKind};

static RE_FIELD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<long>[A-Za-z][A-Za-z0-9_-]*)?\|(?P<short>.)(?::(?P<mods>[^=]*))?(?:=(?P<desc>.*))?$")
        .unwrap()
});
static RE_MODS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<flag>\+)?(?:~(?P<type>[A-Za-z]+))?(?P<count>\.\.\.|[0-9]+)?$").unwrap()
});

/// Parse one declaration. Errors are usage errors, reported like parse failures.
pub fn parse_field(field: &str) -> vex::Result<OptionDesc> {
    let caps = RE_FIELD
        .captures(field.trim())
        .ok_or_else(|| invalid(format!("malformed field: {}", field)))?;

    // Regex guarantees exactly one char in `short`
    let short = caps["short"].chars().next().unwrap_or_default();
    let mods = caps.name("mods").map_or("", |m| m.as_str());
    let mods = RE_MODS
        .captures(mods)
        .ok_or_else(|| invalid(format!("invalid modifiers in field: {}", field)))?;

    let is_flag = mods.name("flag").is_some();
    let kind = match mods.name("type").map(|m| m.as_str()) {
        None if is_flag => ValueKind::Flag,
        Some(_) if is_flag => {
            return Err(invalid(format!("flag cannot have a type: {}", field)));
        }
        None | Some("string") => ValueKind::String,
        Some("int" | "integer") => ValueKind::Integer,
        Some("float") => ValueKind::Float,
        Some(other) => return Err(invalid(format!("unknown type: {}", other))),
    };

    let mut desc = match caps.name("long") {
        Some(long) => OptionDesc::new(short, long.as_str(), kind),
        None => OptionDesc::short_only(short, kind),
    };

    match mods.name("count").map(|m| m.as_str()) {
        None => {}
        Some(_) if is_flag => {
            return Err(invalid(format!("flag cannot take values: {}", field)));
        }
        Some("...") => desc = desc.unbounded(),
        Some(n) => {
            let count = n
                .parse::<usize>()
                .map_err(|_| invalid(format!("invalid count in field: {}", field)))?;
            desc = desc.max_count(count);
        }
    }

    if let Some(text) = caps.name("desc") {
        desc = desc.description(text.as_str().trim());
    }

    Ok(desc)
}

/// Parse a declaration file: one field per line, `#` comments and blank
/// lines skipped.
pub fn parse_fields(content: &str) -> vex::Result<Vec<OptionDesc>> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(parse_field)
        .collect()
}

fn invalid(msg: String) -> vex::Error {
    vex::Error::InvalidValue(msg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_field_with_description() {
        let d = parse_field("count|c:~int=How many").unwrap();
        assert_eq!(d.long_name.as_deref(), Some("count"));
        assert_eq!(d.short_name, 'c');
        assert_eq!(d.kind, ValueKind::Integer);
        assert_eq!(d.max_count, Some(1));
        assert_eq!(d.description, "How many");
    }

    #[test]
    fn default_type_is_string() {
        let d = parse_field("name|n").unwrap();
        assert_eq!(d.kind, ValueKind::String);
        assert!(d.description.is_empty());
    }

    #[test]
    fn flag_field() {
        let d = parse_field("verbose|v:+=Talk more").unwrap();
        assert_eq!(d.kind, ValueKind::Flag);
        assert_eq!(d.max_count, Some(0));
    }

    #[test]
    fn short_only_field() {
        let d = parse_field("|q:+").unwrap();
        assert_eq!(d.long_name, None);
        assert_eq!(d.short_name, 'q');
    }

    #[test]
    fn unbounded_and_counted_fields() {
        assert_eq!(parse_field("input|i:~string...").unwrap().max_count, None);
        let d = parse_field("ratio|r:~float2").unwrap();
        assert_eq!(d.kind, ValueKind::Float);
        assert_eq!(d.max_count, Some(2));
    }

    #[test]
    fn description_may_contain_separators() {
        let d = parse_field("mode|m=one of a|b:c").unwrap();
        assert_eq!(d.description, "one of a|b:c");
    }

    #[test]
    fn non_alphabetic_short_passes_through_to_registration() {
        // Validation of the short name belongs to the registry
        assert_eq!(parse_field("one|1:+").unwrap().short_name, '1');
    }

    #[test]
    fn malformed_fields_are_rejected() {
        for field in ["count", "count|", "count|c:~", "count|c:!", "|"] {
            assert!(parse_field(field).is_err(), "{}", field);
        }
    }

    #[test]
    fn flag_with_type_or_count_is_rejected() {
        assert!(parse_field("all|a:+~int").is_err());
        assert!(parse_field("all|a:+...").is_err());
    }

    #[test]
    fn unknown_type_is_rejected() {
        let err = parse_field("when|w:~date").unwrap_err();
        assert_eq!(err, vex::Error::InvalidValue("unknown type: date".to_string()));
    }

    #[test]
    fn fields_file_skips_comments() {
        let fields = parse_fields("# options\ncount|c:~int\n\n  name|n  \n").unwrap();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[1].short_name, 'n');
    }
}
