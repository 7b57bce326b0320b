//! Binary entry point for the jenkinshash CLI.
#![forbid(unsafe_code)]

#[path = "jenkinshash/config.rs"]
mod config;
#[path = "jenkinshash/ui.rs"]
mod ui;

use std::error::Error;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use jenkinshash::{
    cli::{
        input::{parse_delimiter, read_bytes, read_matrix_from, InputSource, MatrixInputConfig},
        report::{HashReport, LabelledHash, Radix},
    },
    hash_rows, hash_text, logging, one_at_a_time, ElementType,
};
use tracing::info;

use config::{CliConfig, Profile, ProfileUpdate};
use ui::{format_duration, ColorMode, Ui};

const USAGE: [&str; 2] = [
    "jenkinshash  H = jenkinshash rows [FILE] [--type TYPE]  Jenkins one-at-a-time hash",
    "             Each line of FILE is one row of numbers or chars; each output line is that row's 32-bit hash.",
];

#[derive(Parser, Debug)]
#[command(
    name = "jenkinshash",
    version,
    about = "Jenkins one-at-a-time hash of matrix rows",
    disable_help_subcommand = true
)]
struct Cli {
    #[arg(
        long,
        global = true,
        value_enum,
        help = "Output format (defaults to the profile's, then text)"
    )]
    format: Option<OutputFormat>,

    #[arg(
        long,
        global = true,
        value_name = "PATH",
        env = "JENKINSHASH_CONFIG",
        help = "CLI config file"
    )]
    config: Option<PathBuf>,

    #[arg(long, global = true, value_name = "NAME", help = "Config profile to apply")]
    profile: Option<String>,

    #[arg(
        long,
        global = true,
        value_name = "FILTER",
        env = "JENKINSHASH_LOG",
        default_value = "warn",
        help = "Log filter directive written to stderr"
    )]
    log_level: String,

    #[arg(long, global = true, value_enum, default_value_t = ColorArg::Auto, help = "When to colour status and config output")]
    color: ColorArg,

    #[arg(long, short, global = true, help = "Suppress progress and status messages")]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct RowsCmd {
    #[arg(value_name = "FILE", help = "Delimited matrix, one row per line (stdin if omitted or '-')")]
    file: Option<PathBuf>,

    #[arg(long = "type", short = 't', value_enum, help = "Element type of every cell")]
    element_type: Option<ElementTypeArg>,

    #[arg(long, short = 'd', value_name = "CHAR", help = "Field delimiter (',' by default; 'tab' for tabs)")]
    delimiter: Option<String>,

    #[arg(long, conflicts_with = "no_headers", help = "Skip the first line as a header")]
    has_headers: bool,

    #[arg(long, help = "Treat the first line as data, even when the profile has headers")]
    no_headers: bool,

    #[arg(long, value_enum, help = "Radix for text output")]
    radix: Option<RadixArg>,
}

impl RowsCmd {
    fn headers(&self) -> Option<bool> {
        match (self.has_headers, self.no_headers) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}

#[derive(Args, Debug)]
struct SetProfileCmd {
    #[arg(value_name = "NAME")]
    name: String,

    #[arg(long = "type", value_enum)]
    element_type: Option<ElementTypeArg>,

    #[arg(long, value_name = "CHAR")]
    delimiter: Option<String>,

    #[arg(long, value_name = "BOOL")]
    has_headers: Option<bool>,

    #[arg(long, value_enum)]
    radix: Option<RadixArg>,

    #[arg(long = "output", value_enum, help = "Output format stored in the profile")]
    output: Option<OutputFormat>,

    #[arg(long = "default", help = "Also make this the default profile")]
    make_default: bool,
}

#[derive(Subcommand, Debug)]
enum ConfigCmd {
    #[command(about = "Show the config file and its profiles")]
    Show,

    #[command(about = "Print the config file path")]
    Path,

    #[command(about = "Create or update a profile")]
    SetProfile(SetProfileCmd),

    #[command(about = "Select the default profile")]
    Use {
        #[arg(value_name = "NAME", required_unless_present = "clear")]
        name: Option<String>,

        #[arg(long, conflicts_with = "name", help = "Clear the default profile")]
        clear: bool,
    },

    #[command(about = "Delete a profile")]
    Delete {
        #[arg(value_name = "NAME")]
        name: String,
    },
}

#[derive(Subcommand, Debug)]
enum Command {
    #[command(about = "Hash each row of a delimited matrix")]
    Rows(RowsCmd),

    #[command(about = "Hash each argument as one row of characters")]
    Text {
        #[arg(value_name = "STRING", required = true)]
        strings: Vec<String>,

        #[arg(long, value_enum)]
        radix: Option<RadixArg>,
    },

    #[command(about = "Hash the raw bytes of a file as one sequence")]
    Bytes {
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,

        #[arg(long, value_enum)]
        radix: Option<RadixArg>,
    },

    #[command(subcommand, about = "Inspect or edit the CLI config file")]
    Config(ConfigCmd),
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub(crate) enum RadixArg {
    #[value(alias = "decimal")]
    Dec,
    Hex,
}

impl From<RadixArg> for Radix {
    fn from(radix: RadixArg) -> Self {
        match radix {
            RadixArg::Dec => Radix::Decimal,
            RadixArg::Hex => Radix::Hex,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub(crate) enum ElementTypeArg {
    Char,
    #[value(alias = "i8")]
    Int8,
    #[value(alias = "u8")]
    Uint8,
    #[value(alias = "i16")]
    Int16,
    #[value(alias = "u16")]
    Uint16,
    #[value(alias = "i32")]
    Int32,
    #[value(alias = "u32")]
    Uint32,
    #[value(alias = "i64")]
    Int64,
    #[value(alias = "u64")]
    Uint64,
    #[value(alias = "f32")]
    Single,
    #[value(alias = "f64")]
    Double,
    #[value(alias = "bool")]
    Logical,
    Complex,
}

impl From<ElementTypeArg> for ElementType {
    fn from(ty: ElementTypeArg) -> Self {
        match ty {
            ElementTypeArg::Char => ElementType::Char,
            ElementTypeArg::Int8 => ElementType::Int8,
            ElementTypeArg::Uint8 => ElementType::Uint8,
            ElementTypeArg::Int16 => ElementType::Int16,
            ElementTypeArg::Uint16 => ElementType::Uint16,
            ElementTypeArg::Int32 => ElementType::Int32,
            ElementTypeArg::Uint32 => ElementType::Uint32,
            ElementTypeArg::Int64 => ElementType::Int64,
            ElementTypeArg::Uint64 => ElementType::Uint64,
            ElementTypeArg::Single => ElementType::Single,
            ElementTypeArg::Double => ElementType::Double,
            ElementTypeArg::Logical => ElementType::Logical,
            ElementTypeArg::Complex => ElementType::Complex,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum ColorArg {
    Auto,
    Always,
    Never,
}

impl From<ColorArg> for ColorMode {
    fn from(color: ColorArg) -> Self {
        match color {
            ColorArg::Auto => ColorMode::Auto,
            ColorArg::Always => ColorMode::Always,
            ColorArg::Never => ColorMode::Never,
        }
    }
}

fn main() {
    if std::env::args_os().len() <= 1 {
        for line in USAGE {
            println!("{line}");
        }
        return;
    }
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    logging::init_logging(&cli.log_level)?;
    let ui = Ui::new(cli.color.into(), cli.quiet);
    let mut config = CliConfig::load(cli.config.clone())?;

    match cli.command {
        Command::Config(cmd) => run_config(cmd, &mut config, &ui)?,
        Command::Rows(cmd) => {
            let profile = config.select(cli.profile.as_deref())?;
            let format = resolve_format(cli.format, profile);
            run_rows(&cmd, profile, format, &ui)?;
        }
        Command::Text { strings, radix } => {
            let profile = config.select(cli.profile.as_deref())?;
            let format = resolve_format(cli.format, profile);
            let radix = resolve_radix(radix, profile);
            let results: Vec<LabelledHash> = strings
                .iter()
                .map(|s| LabelledHash {
                    input: s.clone(),
                    hash: hash_text(s),
                })
                .collect();
            emit(format, &results, || print_labelled(&results, radix))?;
        }
        Command::Bytes { file, radix } => {
            let profile = config.select(cli.profile.as_deref())?;
            let format = resolve_format(cli.format, profile);
            let radix = resolve_radix(radix, profile);
            let source = InputSource::from_arg(file.as_deref());
            let bytes = read_bytes(&source)?;
            info!(len = bytes.len(), "hashing raw bytes");
            let result = LabelledHash {
                input: match &source {
                    InputSource::Stdin => "-".to_string(),
                    InputSource::Path(path) => path.display().to_string(),
                },
                hash: one_at_a_time(&bytes),
            };
            emit(format, &result, || println!("{}", radix.format(result.hash)))?;
        }
    }

    Ok(())
}

fn run_rows(
    cmd: &RowsCmd,
    profile: Option<&Profile>,
    format: OutputFormat,
    ui: &Ui,
) -> Result<(), Box<dyn Error>> {
    let element_type: ElementType = cmd
        .element_type
        .or(profile.and_then(|p| p.element_type))
        .unwrap_or(ElementTypeArg::Uint8)
        .into();
    element_type.ensure_supported()?;

    let delimiter = match cmd
        .delimiter
        .as_deref()
        .or(profile.and_then(|p| p.delimiter.as_deref()))
    {
        Some(raw) => parse_delimiter(raw)?,
        None => b',',
    };
    let input_cfg = MatrixInputConfig {
        element_type,
        delimiter,
        has_headers: cmd
            .headers()
            .or(profile.and_then(|p| p.has_headers))
            .unwrap_or(false),
    };
    let radix = resolve_radix(cmd.radix, profile);
    let source = InputSource::from_arg(cmd.file.as_deref());

    let task = ui.task(format!("hashing {element_type} rows"));
    let matrix = read_matrix_from(&source, &input_cfg)?;
    let hashes = hash_rows(&matrix.as_matrix())?;
    let elapsed = task.finish();
    info!(rows = hashes.len(), ?elapsed, "hashed rows");

    if hashes.is_empty() {
        ui.warn("input contained no rows");
    } else {
        ui.info(&format!(
            "hashed {} rows in {}",
            hashes.len(),
            format_duration(elapsed)
        ));
    }

    let report = HashReport {
        element_type,
        rows: matrix.rows(),
        columns: matrix.cols(),
        hashes,
    };
    emit(format, &report, || print!("{}", report.to_text(radix)))
}

fn run_config(cmd: ConfigCmd, config: &mut CliConfig, ui: &Ui) -> Result<(), Box<dyn Error>> {
    match cmd {
        ConfigCmd::Show => {
            let path = config
                .path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "(none)".into());
            ui.table(
                "config",
                [
                    ("path", path),
                    (
                        "default_profile",
                        config.default_profile_name().unwrap_or("(none)").to_string(),
                    ),
                ],
            );
            for profile in config.profiles() {
                ui.table(&format!("profiles.{}", profile.name), profile_rows(profile));
            }
            if config.profiles().next().is_none() {
                ui.info("no profiles configured; built-in defaults apply");
            }
        }
        ConfigCmd::Path => match config.path() {
            Some(path) => println!("{}", path.display()),
            None => return Err(Box::new(config::ConfigError::NoConfigPath)),
        },
        ConfigCmd::SetProfile(cmd) => {
            let update = ProfileUpdate {
                element_type: cmd.element_type,
                delimiter: cmd.delimiter,
                has_headers: cmd.has_headers,
                radix: cmd.radix,
                format: cmd.output,
            };
            config.upsert_profile(&cmd.name, update)?;
            if cmd.make_default {
                config.set_default_profile(Some(&cmd.name))?;
            }
            let path = config.persist()?;
            ui.success(&format!("saved profile '{}' to {}", cmd.name, path.display()));
        }
        ConfigCmd::Use { name, clear: _ } => {
            config.set_default_profile(name.as_deref())?;
            let path = config.persist()?;
            match name {
                Some(name) => ui.success(&format!("default profile is now '{name}'")),
                None => ui.success(&format!("cleared default profile in {}", path.display())),
            }
        }
        ConfigCmd::Delete { name } => {
            config.delete_profile(&name)?;
            config.persist()?;
            ui.success(&format!("deleted profile '{name}'"));
        }
    }
    Ok(())
}

fn profile_rows(profile: &Profile) -> Vec<(&'static str, String)> {
    let mut rows = Vec::new();
    if let Some(ty) = profile.element_type {
        rows.push(("element_type", ElementType::from(ty).to_string()));
    }
    if let Some(delimiter) = &profile.delimiter {
        rows.push(("delimiter", format!("{delimiter:?}")));
    }
    if let Some(has_headers) = profile.has_headers {
        rows.push(("has_headers", has_headers.to_string()));
    }
    if let Some(radix) = profile.radix {
        rows.push(("radix", format!("{radix:?}").to_ascii_lowercase()));
    }
    if let Some(format) = profile.format {
        rows.push(("format", format!("{format:?}").to_ascii_lowercase()));
    }
    if rows.is_empty() {
        rows.push(("settings", "(defaults)".to_string()));
    }
    rows
}

fn resolve_format(explicit: Option<OutputFormat>, profile: Option<&Profile>) -> OutputFormat {
    explicit
        .or(profile.and_then(|p| p.format))
        .unwrap_or(OutputFormat::Text)
}

fn resolve_radix(explicit: Option<RadixArg>, profile: Option<&Profile>) -> Radix {
    explicit
        .or(profile.and_then(|p| p.radix))
        .map(Radix::from)
        .unwrap_or_default()
}

fn print_labelled(results: &[LabelledHash], radix: Radix) {
    for result in results {
        println!("{}", radix.format(result.hash));
    }
}

fn emit<T, F>(format: OutputFormat, value: &T, printer: F) -> Result<(), Box<dyn Error>>
where
    T: serde::Serialize,
    F: FnOnce(),
{
    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(value)?;
            println!("{json}");
        }
        OutputFormat::Text => printer(),
    }
    Ok(())
}
