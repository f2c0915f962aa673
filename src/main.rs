//! Entry point for the RuClim application.
//! Handles CLI parsing, logging setup and dispatches the climatology, matching and describe commands.

use clap::Parser;
use ru_clim::interpolation::{InterpMethod, OutOfBounds};
use ru_clim::matching::{match_coord_with, MatchOptions};
use ru_clim::metadata::{describe_array, list_variables_and_dimensions, ArraySummary};
use ru_clim::netcdf_io::{open_labeled_array, write_labeled_array};
use ru_clim::parallel::{ParallelConfig, ParallelInfo};
use ru_clim::{annual_climatology, climatology_mean, LabeledArray, Result};
use std::path::Path;
use tracing_subscriber::EnvFilter;

mod cli;

use cli::{Args, Command};

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    println!(
        r#"
------------------------------------------------------------------
             ____        ____ _ _
            |  _ \ _   _/ ___| (_)_ __ ___
            | |_) | | | | |   | | | '_ ` _ \
            |  _ <| |_| | |___| | | | | | | |
            |_| \_\\__,_|\____|_|_|_| |_| |_|
                 Rust-based climatology tool
------------------------------------------------------------------
"#
    );

    if let Err(e) = run(args) {
        eprintln!("❌ {e}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    ParallelConfig::new(args.threads).setup_global_pool()?;
    if args.verbose > 0 {
        ParallelInfo::collect().print_info();
    }

    match args.command {
        Command::Climatology {
            input,
            period,
            output,
        } => {
            let array = open_labeled_array(&input.file, &input.var)?;
            println!("🔄 Computing {period} climatology of '{}'", input.var);
            let result = climatology_mean(&array, &period)?;
            emit(&result, output.output.as_deref())
        }
        Command::Annual { input, output } => {
            let array = open_labeled_array(&input.file, &input.var)?;
            println!("🔄 Computing annual climatology of '{}'", input.var);
            let result = annual_climatology(&array)?;
            emit(&result, output.output.as_deref())
        }
        Command::Match {
            input,
            reference,
            reference_var,
            method,
            order,
            extrapolate,
            output,
        } => {
            let source = open_labeled_array(&input.file, &input.var)?;
            let reference = open_labeled_array(&reference, &reference_var)?;
            let method = InterpMethod::parse(&method, order)?;
            let bounds = if extrapolate {
                OutOfBounds::Extrapolate
            } else {
                OutOfBounds::Nan
            };

            println!("🔄 Matching '{}' onto the grid of '{reference_var}' ({method})", input.var);
            let options = MatchOptions::new(method).with_out_of_bounds(bounds);
            let result = match_coord_with(&source, &reference, &options)?;
            emit(&result, output.output.as_deref())
        }
        Command::Describe { file, var } => match var {
            Some(var) => {
                describe_array(&open_labeled_array(&file, &var)?);
                Ok(())
            }
            None => {
                let file = netcdf::open(&file)?;
                list_variables_and_dimensions(&file)
            }
        },
    }
}

/// Writes `result` to `output`, or prints it when no path is given
fn emit(result: &LabeledArray, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            write_labeled_array(result, path)?;
            println!("✅ Saved result to {}", path.display());
        }
        None => {
            print!("{result}");
            println!("\n Summary:");
            ArraySummary::of(result).print();
        }
    }
    Ok(())
}

/// Maps the `--verbose` count to a log level unless `RUST_LOG` is set.
fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("ru_clim={level},ruclim={level}")));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
