use std::env;
use std::path::Path;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};

use wavelength_analyzer::pipeline::{analyze_range_upload, export_range_upload, fit_upload, Upload};

const USAGE: &str = "\
Usage:
  wavelength-analyzer range  <file.csv|file.xlsx> <min_nm> <max_nm>
  wavelength-analyzer export <file.csv|file.xlsx> <min_nm> <max_nm> <out.xlsx>
  wavelength-analyzer fit    <file.csv|file.xlsx> <linear_ax|quadratic|log_n_x>";

fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e:#}");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &[String]) -> Result<()> {
    let Some(command) = args.first() else {
        bail!("{USAGE}");
    };

    match (command.as_str(), &args[1..]) {
        ("range", [file, min, max]) => {
            let raw = read_upload(file)?;
            let upload = Upload::new(file, &raw);
            let result = analyze_range_upload(&upload, parse_nm(min)?, parse_nm(max)?)?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        ("export", [file, min, max, out]) => {
            let raw = read_upload(file)?;
            let upload = Upload::new(file, &raw);
            let bytes = export_range_upload(&upload, parse_nm(min)?, parse_nm(max)?)?;
            std::fs::write(out, &bytes).with_context(|| format!("writing {out}"))?;
            log::info!("wrote {out}");
        }
        ("fit", [file, function_type]) => {
            let raw = read_upload(file)?;
            let upload = Upload::new(file, &raw);
            let result = fit_upload(&upload, function_type)?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        _ => bail!("{USAGE}"),
    }
    Ok(())
}

fn read_upload(file: &str) -> Result<Vec<u8>> {
    std::fs::read(Path::new(file)).with_context(|| format!("reading {file}"))
}

fn parse_nm(s: &str) -> Result<f64> {
    s.trim()
        .parse::<f64>()
        .with_context(|| format!("'{s}' is not a wavelength"))
}
