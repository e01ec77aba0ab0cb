//! vexdump — declare options, parse an argument vector, print the tokens.
//!
//! Everything before the first `--` configures vexdump itself; everything
//! after it is the argument vector handed to the declared parser:
//!
//! `vexdump -d 'count|c:~int=How many' -d 'verbose|v:+' -- -v --count=3 file.txt`

mod field;
mod render;

use anyhow::{bail, Context, Result};
use std::ffi::OsString;
use std::fs;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use vex::{LongMatch, OptionDesc, Parser, Value, ValueKind};

/// Exit code for usage/argument errors.
const EXIT_USAGE: u8 = 2;

/// Environment variable holding the log filter.
const LOG_ENV: &str = "VEX_LOG";

/// Settings gathered from vexdump's own arguments.
#[derive(Debug, Default)]
struct Settings {
    name: String,
    description: Option<String>,
    fields: Vec<String>,
    files: Vec<String>,
    long_match: LongMatch,
    json: bool,
    preview_help: bool,
}

fn main() -> ExitCode {
    init_logging();

    match utf8_args(std::env::args_os()).and_then(|argv| run(&argv)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => match e.downcast_ref::<vex::Error>() {
            Some(usage) => {
                eprintln!("Error: {}\n", usage);
                eprintln!("  Run \"vexdump -h\" for more information.");
                ExitCode::from(EXIT_USAGE)
            }
            None => {
                eprintln!("Error: {:#}", e);
                ExitCode::FAILURE
            }
        },
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Arguments as UTF-8; anything else is a usage error.
fn utf8_args<I: IntoIterator<Item = OsString>>(args: I) -> Result<Vec<String>> {
    args.into_iter()
        .map(|arg| {
            arg.into_string().map_err(|bad| {
                anyhow::Error::from(vex::Error::InvalidValue(format!(
                    "argument is not valid UTF-8: {:?}",
                    bad
                )))
            })
        })
        .collect()
}

fn run(argv: &[String]) -> Result<()> {
    let (own, target) = split_target(argv);

    let mut cli = cli_parser()?;
    cli.parse(own)?;

    if cli.arg_found("help") {
        print!("{}", cli.get_help());
        return Ok(());
    }
    if cli.arg_found("version") {
        println!("{} {}", cli.name(), cli.get_version());
        return Ok(());
    }

    let settings = read_settings(&cli)?;
    tracing::debug!(?settings, "settings");

    let mut parser = declared_parser(&settings)?;

    if settings.preview_help {
        print!("{}", parser.get_help());
        return Ok(());
    }

    let args = std::iter::once(settings.name.as_str()).chain(target.iter().map(String::as_str));
    parser.parse(args)?;

    let renderer = render::create_renderer(settings.json);
    print!("{}", renderer.render(&parser)?);
    Ok(())
}

/// Split at the first `--`: vexdump's own arguments (with argv[0]) and the
/// target argument vector.
fn split_target(argv: &[String]) -> (&[String], &[String]) {
    match argv.iter().skip(1).position(|a| a == "--").map(|p| p + 1) {
        Some(pos) => (&argv[..pos], &argv[pos + 1..]),
        None => (argv, &argv[argv.len()..]),
    }
}

fn cli_parser() -> vex::Result<Parser> {
    let mut p = Parser::new("vexdump", env!("CARGO_PKG_VERSION")).with_description(
        "Declare options with argsh-style fields, parse the arguments after `--`,\n\
         and print the resulting tokens.",
    );
    p.register(
        OptionDesc::new('d', "declare", ValueKind::String)
            .description("Declare an option: long|s[:mods][=description]"),
    )?;
    p.register(OptionDesc::new('f', "file", ValueKind::String).description(
        "Read declarations from a file, one per line (numeric paths: --file=PATH)",
    ))?;
    p.register(OptionDesc::new('n', "name", ValueKind::String).description(
        "Program name for the declared parser, default prog (numeric: --name=NAME)",
    ))?;
    p.register(OptionDesc::new('D', "description", ValueKind::String).description(
        "Description for the declared parser's help text (numeric: --description=TEXT)",
    ))?;
    p.register(
        OptionDesc::flag('P', "prefix").description("Match long options by registered prefix"),
    )?;
    p.register(OptionDesc::flag('j', "json").description("Print tokens as JSON"))?;
    p.register(
        OptionDesc::flag('p', "preview-help").description("Print the declared parser's help text"),
    )?;
    Ok(p)
}

fn read_settings(cli: &Parser) -> Result<Settings> {
    if let Some(stray) = cli.free_values().next() {
        return Err(vex::Error::InvalidValue(format!("unexpected argument: {}", stray)).into());
    }

    let strings = |name: &'static str| -> Vec<String> {
        cli.values_of(name)
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect()
    };

    Ok(Settings {
        name: strings("name").pop().unwrap_or_else(|| "prog".to_string()),
        description: strings("description").pop(),
        fields: strings("declare"),
        files: strings("file"),
        long_match: if cli.arg_found("prefix") {
            LongMatch::Prefix
        } else {
            LongMatch::Exact
        },
        json: cli.arg_found("json"),
        preview_help: cli.arg_found("preview-help"),
    })
}

/// Build the parser described by `--declare` and `--file`.
fn declared_parser(settings: &Settings) -> Result<Parser> {
    let mut parser = Parser::new(settings.name.as_str(), "").with_long_match(settings.long_match);
    if let Some(ref description) = settings.description {
        parser = parser.with_description(description.as_str());
    }

    let mut declarations = Vec::new();
    for path in &settings.files {
        let content =
            fs::read_to_string(path).with_context(|| format!("failed to read {}", path))?;
        declarations.extend(field::parse_fields(&content)?);
    }
    for field in &settings.fields {
        declarations.push(field::parse_field(field)?);
    }
    if declarations.is_empty() {
        bail!("no options declared; use --declare or --file");
    }

    for desc in declarations {
        parser.register(desc)?;
    }
    Ok(parser)
}
