#![forbid(unsafe_code)]

mod error;

use clap::{Parser, Subcommand, ValueEnum};
use error::{CliError, ErrorCode};
use logofit::logofit_core::{
    BoundsSource, ContainmentRegion, FitReport, ShapeBounds, decode_raster, extract_raster_bounds,
    extract_svg_bounds_detailed,
};
use logofit::{EmbeddedRaster, FitConfig, FitMode, LogoFormat, LogoSession, OutlineMask, load_logo};
use serde::Serialize;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "logofit", version, about = "Measure logos and fit them into outline masks or lockup slots")]
struct Cli {
    /// More logging on stderr (-v debug, -vv trace). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the tight bounds of an SVG, PNG or JPEG logo.
    Bounds {
        /// Logo file, or `-` for stdin.
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },
    /// Fit a logo into a target region and print the transform.
    Fit {
        /// Logo file, or `-` for stdin.
        #[arg(value_name = "FILE")]
        input: PathBuf,

        #[arg(long, value_enum)]
        mode: Option<Mode>,

        /// Outline mask JSON (`outlinePath`, `fillPath`, `center`).
        #[arg(long, value_name = "JSON")]
        mask: Option<PathBuf>,

        /// Margin in percent (0-100). Defaults to 10 for outline and 0 for lockups.
        #[arg(long, value_name = "PCT")]
        padding: Option<f64>,

        /// Perimeter samples per fit test.
        #[arg(long, value_name = "N")]
        samples: Option<usize>,

        /// Fit configuration JSON; flags override its values.
        #[arg(long, value_name = "JSON")]
        config: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Mode {
    Outline,
    LockupHorizontal,
    LockupVertical,
}

impl From<Mode> for FitMode {
    fn from(value: Mode) -> Self {
        match value {
            Mode::Outline => FitMode::Outline,
            Mode::LockupHorizontal => FitMode::LockupHorizontal,
            Mode::LockupVertical => FitMode::LockupVertical,
        }
    }
}

#[derive(Serialize)]
struct BoundsOut {
    format: LogoFormat,
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<BoundsSource>,
    bounds: ShapeBounds,
}

#[derive(Serialize)]
struct FitOut<'a> {
    format: LogoFormat,
    bounds: ShapeBounds,
    region: &'a ContainmentRegion,
    #[serde(flatten)]
    report: FitReport,
}

fn read_input(input: &Path) -> Result<(Vec<u8>, String), CliError> {
    if input.as_os_str() == "-" {
        let mut buf = Vec::new();
        std::io::stdin().read_to_end(&mut buf).map_err(|e| {
            CliError::new(ErrorCode::Input, format!("Failed to read stdin: {e}"))
        })?;
        tracing::debug!(bytes = buf.len(), "read logo from stdin");
        return Ok((buf, "stdin".to_string()));
    }
    let bytes = std::fs::read(input).map_err(|e| input_error(input, e))?;
    let name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    tracing::debug!(bytes = bytes.len(), path = %input.display(), "read logo file");
    Ok((bytes, name))
}

fn input_error(path: &Path, err: std::io::Error) -> CliError {
    CliError::new(
        ErrorCode::Input,
        format!("Failed to read {}: {err}", path.display()),
    )
}

fn read_text(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|e| input_error(path, e))
}

fn bounds(input: &Path) -> Result<BoundsOut, CliError> {
    let (bytes, name) = read_input(input)?;
    let format = LogoFormat::sniff(&bytes, &name)?;
    if format.is_raster() {
        let image = decode_raster(&bytes)?;
        let crop = extract_raster_bounds(&image)?;
        return Ok(BoundsOut {
            format,
            source: None,
            bounds: crop.bounds,
        });
    }
    let text = std::str::from_utf8(&bytes)
        .map_err(|e| CliError::new(ErrorCode::Input, format!("SVG is not UTF-8: {e}")))?;
    let extraction = extract_svg_bounds_detailed(text.trim_start_matches('\u{feff}'))?;
    Ok(BoundsOut {
        format,
        source: Some(extraction.source),
        bounds: extraction.bounds,
    })
}

struct FitArgs {
    input: PathBuf,
    mode: Option<Mode>,
    mask: Option<PathBuf>,
    padding: Option<f64>,
    samples: Option<usize>,
    config: Option<PathBuf>,
}

fn fit_config(args: &FitArgs) -> Result<FitConfig, CliError> {
    let mut config = match &args.config {
        Some(path) => FitConfig::from_json(&read_text(path)?)?,
        None => FitConfig::default(),
    };
    if let Some(mode) = args.mode {
        config.mode = mode.into();
    }
    if let Some(path) = &args.mask {
        config.mask = Some(OutlineMask::from_json(&read_text(path)?)?);
    }
    if let Some(padding) = args.padding {
        if !(0.0..=100.0).contains(&padding) {
            return Err(CliError::new(
                ErrorCode::Usage,
                format!("--padding must be between 0 and 100, got {padding}"),
            ));
        }
        config.padding_pct = Some(padding);
    }
    if let Some(samples) = args.samples {
        config.fit.samples = samples;
        config
            .fit
            .validate()
            .map_err(|e| CliError::new(ErrorCode::Usage, format!("--samples: {e}")))?;
    }
    Ok(config)
}

fn fit(args: FitArgs, pretty: bool) -> Result<String, CliError> {
    let config = fit_config(&args)?;
    let (bytes, name) = read_input(&args.input)?;
    let logo = load_logo(&bytes, &name, &EmbeddedRaster)?;
    let format = logo.format;
    let bounds = logo.bounds;

    tracing::info!(
        mode = ?config.mode,
        padding_pct = config.padding_pct(),
        samples = config.fit.samples,
        "fitting logo"
    );
    let mut session = LogoSession::from_config(&config)?;
    let report = session.load(logo)?;
    let out = FitOut {
        format,
        bounds,
        region: session.region(),
        report,
    };
    to_json(&out, pretty)
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String, CliError> {
    Ok(if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    })
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn run(cli: Cli) -> Result<String, CliError> {
    match cli.command {
        Command::Bounds { input } => to_json(&bounds(&input)?, cli.pretty),
        Command::Fit {
            input,
            mode,
            mask,
            padding,
            samples,
            config,
        } => fit(
            FitArgs {
                input,
                mode,
                mask,
                padding,
                samples,
                config,
            },
            cli.pretty,
        ),
    }
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if !err.use_stderr() => err.exit(),
        Err(err) => {
            let _ = err.print();
            std::process::exit(ErrorCode::Usage as i32);
        }
    };
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(json) => println!("{json}"),
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(err.exit_code());
        }
    }
}
