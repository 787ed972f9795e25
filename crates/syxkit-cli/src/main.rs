use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use glob::glob;
use serde::Serialize;
use syxkit_core::{analyze_file, batch_decode, DefinitionConfig, FormatRegistry, ACCESS_VIRUS};

#[derive(Parser, Debug)]
#[command(name = "syxkit")]
#[command(version)]
#[command(long_version = concat!(
    env!("CARGO_PKG_VERSION"),
    " (", env!("SYXKIT_BUILD_COMMIT"), " ", env!("SYXKIT_BUILD_DATE"), ")"
))]
#[command(
    about = "Configuration-driven decoder/encoder for synthesizer SysEx dumps.",
    long_about = None,
    after_help = "Examples:\n  syxkit decode bank.syx -o presets.json\n  syxkit analyse unknown_dump.syx --stdout --pretty\n  syxkit batch dumps/ --format access_virus -o report.json"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Decode a .syx dump or .json preset export into structured presets.
    Decode {
        /// Path to a .syx or .json file (glob patterns accepted)
        input: PathBuf,

        /// Format id of the device definition to use
        #[arg(long, default_value = ACCESS_VIRUS)]
        format: String,

        /// Custom definition config (JSON), registered under --format
        #[arg(long)]
        config: Option<PathBuf>,

        #[command(flatten)]
        output: OutputOpts,
    },

    /// Inventory the SysEx messages in a file of unknown format.
    #[command(alias = "analyse")]
    Analyze {
        /// Input file
        input: PathBuf,

        #[command(flatten)]
        output: OutputOpts,
    },

    /// Decode every .syx/.json file in a directory into one report.
    Batch {
        /// Input directory
        input_dir: PathBuf,

        /// Format id of the device definition to use
        #[arg(long, default_value = ACCESS_VIRUS)]
        format: String,

        /// Custom definition config (JSON), registered under --format
        #[arg(long)]
        config: Option<PathBuf>,

        /// Write <stem>_decoded.json next to each input
        #[arg(long)]
        write_decoded: bool,

        /// Exit with a non-zero code if any file failed to decode
        #[arg(long)]
        strict: bool,

        #[command(flatten)]
        output: OutputOpts,
    },

    /// List registered format ids.
    Formats,

    /// Write a starter definition config for a new device.
    Template {
        /// Device name embedded in the template
        name: String,

        /// Output config path (JSON)
        #[arg(short = 'o', long)]
        output: PathBuf,
    },
}

#[derive(Args, Debug)]
struct OutputOpts {
    /// Output path (JSON)
    #[arg(short = 'o', long, required_unless_present = "stdout")]
    output: Option<PathBuf>,

    /// Write JSON to stdout
    #[arg(long, conflicts_with = "output")]
    stdout: bool,

    /// Pretty-print JSON output
    #[arg(long, conflicts_with = "compact")]
    pretty: bool,

    /// Compact JSON output (default)
    #[arg(long)]
    compact: bool,

    /// Suppress non-error output
    #[arg(long)]
    quiet: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Decode {
            input,
            format,
            config,
            output,
        } => cmd_decode(input, format, config, output),
        Commands::Analyze { input, output } => cmd_analyze(input, output),
        Commands::Batch {
            input_dir,
            format,
            config,
            write_decoded,
            strict,
            output,
        } => cmd_batch(input_dir, format, config, write_decoded, strict, output),
        Commands::Formats => cmd_formats(),
        Commands::Template { name, output } => cmd_template(name, output),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err.message);
            if let Some(hint) = err.hint {
                eprintln!("hint: {}", hint);
            }
            ExitCode::from(2)
        }
    }
}

#[derive(Debug)]
struct CliError {
    message: String,
    hint: Option<String>,
}

impl CliError {
    fn new(message: impl Into<String>, hint: Option<String>) -> Self {
        Self {
            message: message.into(),
            hint,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::new(err.to_string(), None)
    }
}

fn cmd_decode(
    input: PathBuf,
    format: String,
    config: Option<PathBuf>,
    output: OutputOpts,
) -> Result<(), CliError> {
    let input = resolve_input_path(&input)?;
    validate_decode_input(&input)?;

    let registry = build_registry(&format, config.as_deref())?;
    let decoder = registry.get_decoder(&format).map_err(|err| {
        CliError::new(
            err.to_string(),
            Some("use `syxkit formats` to list registered formats".to_string()),
        )
    })?;

    let presets = decoder
        .decode_file(&input)
        .with_context(|| format!("Failed to decode {}", input.display()))?;
    let summary = format!("decoded {} presets", presets.len());
    write_output(&presets, &output, &summary)
}

fn cmd_analyze(input: PathBuf, output: OutputOpts) -> Result<(), CliError> {
    let input = resolve_input_path(&input)?;
    if !input.is_file() {
        return Err(CliError::new(
            format!("input file not found: {}", input.display()),
            Some("pass a SysEx dump to inventory".to_string()),
        ));
    }

    let analysis =
        analyze_file(&input).with_context(|| format!("Failed to analyze {}", input.display()))?;
    let summary = format!("found {} messages", analysis.messages.len());
    write_output(&analysis, &output, &summary)
}

fn cmd_batch(
    input_dir: PathBuf,
    format: String,
    config: Option<PathBuf>,
    write_decoded: bool,
    strict: bool,
    output: OutputOpts,
) -> Result<(), CliError> {
    if !input_dir.is_dir() {
        return Err(CliError::new(
            format!("input is not a directory: {}", input_dir.display()),
            Some("pass a directory of .syx/.json files".to_string()),
        ));
    }

    let registry = build_registry(&format, config.as_deref())?;
    let decoder = registry.get_decoder(&format).map_err(|err| {
        CliError::new(
            err.to_string(),
            Some("use `syxkit formats` to list registered formats".to_string()),
        )
    })?;

    let report = batch_decode(&input_dir, &decoder, write_decoded)
        .with_context(|| format!("Batch decode failed in {}", input_dir.display()))?;
    let summary = format!(
        "decoded {} presets from {} files ({} failed)",
        report.total_presets,
        report.processed.len(),
        report.failed.len()
    );
    write_output(&report, &output, &summary)?;

    if strict && !report.failed.is_empty() {
        return Err(CliError::new(
            "some files failed to decode",
            Some("inspect the `failed` entries in the report".to_string()),
        ));
    }
    Ok(())
}

fn cmd_formats() -> Result<(), CliError> {
    let registry = FormatRegistry::new();
    for format in registry.list_supported() {
        println!("{}", format);
    }
    Ok(())
}

fn cmd_template(name: String, output: PathBuf) -> Result<(), CliError> {
    let template = DefinitionConfig::template(&name);
    let json = serde_json::to_string_pretty(&template)
        .context("JSON serialization failed")
        .map_err(CliError::from)?;

    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create output directory: {}", parent.display())
            })?;
        }
    }
    fs::write(&output, json)
        .with_context(|| format!("Failed to write template: {}", output.display()))?;
    eprintln!("OK: template written -> {}", output.display());
    Ok(())
}

fn build_registry(format: &str, config: Option<&Path>) -> Result<FormatRegistry, CliError> {
    let mut registry = FormatRegistry::new();
    if let Some(config_path) = config {
        registry
            .load_custom_definition(config_path, format)
            .map_err(|err| {
                CliError::new(
                    format!("failed to load definition config: {}", err),
                    Some("generate a starting point with `syxkit template`".to_string()),
                )
            })?;
    }
    Ok(registry)
}

fn write_output<T: Serialize>(
    value: &T,
    opts: &OutputOpts,
    summary: &str,
) -> Result<(), CliError> {
    let json = serialize_json(value, opts.pretty, opts.compact)?;

    if opts.stdout {
        print!("{}", json);
        return Ok(());
    }

    let output = opts
        .output
        .as_ref()
        .expect("output required when not using stdout");
    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create output directory: {}", parent.display())
            })?;
        }
    }
    fs::write(output, json)
        .with_context(|| format!("Failed to write output: {}", output.display()))?;

    if !opts.quiet {
        eprintln!("OK: {} -> {}", summary, output.display());
    }
    Ok(())
}

fn serialize_json<T: Serialize>(
    value: &T,
    pretty: bool,
    compact: bool,
) -> Result<String, CliError> {
    if pretty && compact {
        return Err(CliError::new(
            "cannot use --pretty and --compact together",
            Some("choose one output format".to_string()),
        ));
    }
    if pretty {
        serde_json::to_string_pretty(value)
            .context("JSON serialization failed")
            .map_err(Into::into)
    } else {
        serde_json::to_string(value)
            .context("JSON serialization failed")
            .map_err(Into::into)
    }
}

fn validate_decode_input(input: &Path) -> Result<(), CliError> {
    if !input.exists() {
        return Err(CliError::new(
            format!("input file not found: {}", input.display()),
            Some("use a .syx dump or .json preset export".to_string()),
        ));
    }
    let ext = input
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    if ext != "syx" && ext != "json" {
        return Err(CliError::new(
            format!("unsupported input format '{}'", input.display()),
            Some("expected a .syx or .json file".to_string()),
        ));
    }
    Ok(())
}

fn resolve_input_path(input: &Path) -> Result<PathBuf, CliError> {
    let pattern = input.to_string_lossy();
    if !is_glob_pattern(&pattern) {
        return Ok(input.to_path_buf());
    }

    let mut matches = Vec::new();
    let paths = glob(&pattern).map_err(|err| {
        CliError::new(
            format!("invalid input pattern '{}'", pattern),
            Some(format!("pattern error: {}", err.msg)),
        )
    })?;
    for entry in paths {
        let path = entry.map_err(|err| {
            CliError::new(
                format!("invalid input pattern '{}'", pattern),
                Some(format!("pattern error: {}", err)),
            )
        })?;
        if path.is_file() {
            matches.push(path);
        }
    }

    match matches.len() {
        0 => Err(CliError::new(
            format!("no files match pattern '{}'", pattern),
            Some("check the path or quote the pattern".to_string()),
        )),
        1 => Ok(matches.remove(0)),
        n => Err(CliError::new(
            format!("multiple files match pattern '{}' ({} matches)", pattern, n),
            Some("pass a single file, or use `syxkit batch` on the directory".to_string()),
        )),
    }
}

fn is_glob_pattern(input: &str) -> bool {
    input.contains('*') || input.contains('?') || input.contains('[')
}
