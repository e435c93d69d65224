//! CAN DBC CLI Application
//!
//! Command-line front end for the can-dbc-decoder library. It adds the I/O
//! the library leaves out:
//! - Reading DBC files (with a Latin-1 fallback)
//! - Loading options from a TOML configuration file
//! - Writing the decoded model as JSON
//! - Converting several files in parallel

use anyhow::{bail, Context, Result};
use can_dbc_decoder::{Dbc, Severity, TransmuteConfig, Transmuter};
use clap::Parser;
use rayon::prelude::*;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

mod config;
mod input;
mod report;

use config::AppConfig;

/// CAN DBC to JSON converter
#[derive(Parser, Debug)]
#[command(name = "can-dbc-cli")]
#[command(about = "Convert CAN DBC files into JSON message definitions", long_about = None)]
#[command(version)]
struct Args {
    /// DBC file(s) to convert
    #[arg(value_name = "FILE", required = true)]
    inputs: Vec<PathBuf>,

    /// Output file for one input, output directory for several (default: stdout / next to input)
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Path to configuration file (config.toml)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Drop DM1 messages (PGN 65226) from the output
    #[arg(long)]
    filter_dm1: bool,

    /// Label signals as <Message>.<Signal>
    #[arg(long)]
    extended: bool,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,

    /// Fail when a file has error-severity problems
    #[arg(long)]
    strict: bool,

    /// Verbosity level (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    init_logging(args.verbose, args.quiet);

    log::info!("CAN DBC CLI v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Using decoder library v{}", can_dbc_decoder::VERSION);

    let config = resolve_config(&args)?;
    log::debug!("Effective configuration: {:?}", config);

    if let [path] = args.inputs.as_slice() {
        convert_single(path, args.output.as_deref(), &config, args.quiet)
    } else {
        let dir = args.output.clone().or_else(|| config.output.dir.clone());
        convert_many(&args.inputs, dir.as_deref(), &config, args.quiet)
    }
}

/// Merge the config file (if any) with the command line flags
fn resolve_config(args: &Args) -> Result<AppConfig> {
    let mut config = match &args.config {
        Some(path) => {
            log::info!("Loading configuration from: {:?}", path);
            config::load_config(path)?
        }
        None => AppConfig::default(),
    };

    config.transmute = TransmuteConfig {
        filter_dm1: config.transmute.filter_dm1 || args.filter_dm1,
        extended: config.transmute.extended || args.extended,
    };
    config.output.pretty |= args.pretty;
    config.output.strict |= args.strict;

    Ok(config)
}

/// Convert one file, writing JSON to `output` or stdout
fn convert_single(path: &Path, output: Option<&Path>, config: &AppConfig, quiet: bool) -> Result<()> {
    let dbc = convert_file(path, &config.transmute)?;
    if !quiet {
        eprintln!("{}", report::summary(path, &dbc));
    }

    let json = render(&dbc, config.output.pretty)?;
    match output {
        Some(out) => {
            fs::write(out, json).with_context(|| format!("Failed to write output file {:?}", out))?
        }
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{}", json)?;
        }
    }

    check_strict(path, &dbc, config.output.strict)
}

/// Convert several files in parallel, one JSON file per input
fn convert_many(inputs: &[PathBuf], dir: Option<&Path>, config: &AppConfig, quiet: bool) -> Result<()> {
    if let Some(dir) = dir {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output directory {:?}", dir))?;
    }

    let results: Vec<(&PathBuf, Result<()>)> = inputs
        .par_iter()
        .map(|path| (path, convert_to_file(path, dir, config, quiet)))
        .collect();

    let mut failed = 0;
    for (path, result) in results {
        if let Err(e) = result {
            log::error!("{:?}: {:#}", path, e);
            failed += 1;
        }
    }

    if failed > 0 {
        bail!("{} of {} files failed to convert", failed, inputs.len());
    }
    Ok(())
}

fn convert_to_file(path: &Path, dir: Option<&Path>, config: &AppConfig, quiet: bool) -> Result<()> {
    let dbc = convert_file(path, &config.transmute)?;
    if !quiet {
        eprintln!("{}", report::summary(path, &dbc));
    }

    let out = output_path(path, dir);
    fs::write(&out, render(&dbc, config.output.pretty)?)
        .with_context(|| format!("Failed to write output file {:?}", out))?;
    log::info!("Wrote {:?}", out);

    check_strict(path, &dbc, config.output.strict)
}

/// Read and decode a single DBC file
fn convert_file(path: &Path, config: &TransmuteConfig) -> Result<Dbc> {
    log::info!("Converting DBC file: {:?}", path);
    let text = input::read_dbc_file(path)?;
    let dbc = Transmuter::new(*config)
        .transmute(&text)
        .with_context(|| format!("Failed to parse DBC file {:?}", path))?;

    report::log_problems(path, &dbc);
    Ok(dbc)
}

fn render(dbc: &Dbc, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(dbc)?
    } else {
        serde_json::to_string(dbc)?
    };
    Ok(json)
}

fn check_strict(path: &Path, dbc: &Dbc, strict: bool) -> Result<()> {
    if strict && dbc.has_errors() {
        let errors = dbc
            .problems
            .iter()
            .filter(|p| p.severity == Severity::Error)
            .count();
        bail!("{:?} has {} error-severity problem(s)", path, errors);
    }
    Ok(())
}

/// `<dir>/<stem>.json`, or `<stem>.json` next to the input
fn output_path(input: &Path, dir: Option<&Path>) -> PathBuf {
    let file_name = input.with_extension("json");
    match dir {
        Some(dir) => dir.join(file_name.file_name().unwrap_or(file_name.as_os_str())),
        None => file_name,
    }
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const DBC: &str = "BO_ 2566834688 DM1: 8 ECU1\n SG_ Lamp : 0|2@1+ (1,0) [0|3] \"\" ECU1\nBO_ 291 EngineData: 8 ECU1\n SG_ EngineSpeed : 0|16@1+ (1,0) [0|8000] \"rpm\" ECU2\n";

    #[test]
    fn test_flags_override_config() {
        let args = Args::try_parse_from(["can-dbc-cli", "--extended", "--pretty", "car.dbc"]).unwrap();
        let config = resolve_config(&args).unwrap();

        assert!(config.transmute.extended);
        assert!(!config.transmute.filter_dm1);
        assert!(config.output.pretty);
        assert_eq!(args.inputs, vec![PathBuf::from("car.dbc")]);
    }

    #[test]
    fn test_input_is_required() {
        assert!(Args::try_parse_from(["can-dbc-cli"]).is_err());
    }

    #[test]
    fn test_output_path() {
        assert_eq!(
            output_path(Path::new("dbc/car.dbc"), None),
            PathBuf::from("dbc/car.json")
        );
        assert_eq!(
            output_path(Path::new("dbc/car.dbc"), Some(Path::new("out"))),
            PathBuf::from("out/car.json")
        );
    }

    #[test]
    fn test_convert_single_to_file() {
        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("car.dbc");
        let output = tmp.path().join("car.json");
        fs::write(&input, DBC).unwrap();

        let mut config = AppConfig::default();
        config.transmute = TransmuteConfig::new().with_dm1_filter(true);
        convert_single(&input, Some(&output), &config, true).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(json["params"].as_array().unwrap().len(), 1);
        assert_eq!(json["params"][0]["name"], "EngineData");
    }

    #[test]
    fn test_convert_many_in_parallel() {
        let tmp = TempDir::new().unwrap();
        let out_dir = tmp.path().join("out");
        let inputs: Vec<PathBuf> = ["a.dbc", "b.dbc", "c.dbc"]
            .iter()
            .map(|name| {
                let path = tmp.path().join(name);
                fs::write(&path, DBC).unwrap();
                path
            })
            .collect();

        convert_many(&inputs, Some(&out_dir), &AppConfig::default(), true).unwrap();

        for name in ["a.json", "b.json", "c.json"] {
            let json: serde_json::Value =
                serde_json::from_str(&fs::read_to_string(out_dir.join(name)).unwrap()).unwrap();
            assert_eq!(json["params"].as_array().unwrap().len(), 2);
        }
    }

    #[test]
    fn test_fatal_error_fails_conversion() {
        let tmp = TempDir::new().unwrap();
        let good = tmp.path().join("good.dbc");
        let bad = tmp.path().join("bad.dbc");
        fs::write(&good, DBC).unwrap();
        fs::write(&bad, "BO_ abc Broken: 8 ECU1\n").unwrap();

        let err = convert_many(&[good, bad], None, &AppConfig::default(), true).unwrap_err();
        assert_eq!(err.to_string(), "1 of 2 files failed to convert");
        assert!(tmp.path().join("good.json").exists());
        assert!(!tmp.path().join("bad.json").exists());
    }

    #[test]
    fn test_strict_mode_rejects_errors() {
        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("mux.dbc");
        let output = tmp.path().join("mux.json");
        fs::write(&input, "BO_ 1 Msg: 8 ECU1\n SG_ Sig X : 0|8@1+ (1,0) [0|1] \"\" ECU1\n").unwrap();

        let mut config = AppConfig::default();
        convert_single(&input, Some(&output), &config, true).unwrap();

        config.output.strict = true;
        let err = convert_single(&input, Some(&output), &config, true).unwrap_err();
        assert!(err.to_string().contains("1 error-severity problem"));
    }
}
