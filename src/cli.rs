//! Defines command-line interface options using `clap` for the RuClim application.

use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

/// A CLI tool for climatologies and grid matching of NetCDF variables
#[derive(Parser, Debug)]
#[command(
    name = "RuClim",
    version,
    about = "Day-weighted climatologies and coordinate matching for NetCDF files"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Number of threads to use for parallel processing. Defaults to number of CPU cores.
    #[arg(short = 't', long, global = true)]
    pub threads: Option<usize>,

    /// Increase log verbosity (repeatable, e.g. --verbose --verbose).
    #[arg(long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Day-weighted mean of a variable for each month, season, quarter or year
    Climatology {
        #[command(flatten)]
        input: VariableArgs,

        /// Grouping period: month, season, quarter or year
        #[arg(short, long, default_value = "month")]
        period: String,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Unweighted mean of the monthly climatology
    Annual {
        #[command(flatten)]
        input: VariableArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Resample a lat/lon variable onto the rlat/rlon grid of a reference variable
    Match {
        #[command(flatten)]
        input: VariableArgs,

        /// Path to the NetCDF file holding the reference grid
        #[arg(short = 'r', long)]
        reference: PathBuf,

        /// Variable of the reference file carrying rlat/rlon
        #[arg(short = 'R', long)]
        reference_var: String,

        /// Interpolation method: linear, nearest, zero, slinear, quadratic, cubic or polynomial
        #[arg(short, long, default_value = "linear")]
        method: String,

        /// Polynomial order, required with --method polynomial
        #[arg(long)]
        order: Option<usize>,

        /// Extrapolate beyond the source grid instead of filling with NaN
        #[arg(long, default_value_t = false)]
        extrapolate: bool,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// List the contents of a file, or describe one variable
    Describe {
        /// Path to the NetCDF file
        #[arg(short, long)]
        file: PathBuf,

        /// Variable to describe
        #[arg(short = 'v', long = "var")]
        var: Option<String>,
    },
}

#[derive(ClapArgs, Debug)]
pub struct VariableArgs {
    /// Path to the NetCDF file
    #[arg(short, long)]
    pub file: PathBuf,

    /// Variable to process
    #[arg(short = 'v', long = "var")]
    pub var: String,
}

#[derive(ClapArgs, Debug)]
pub struct OutputArgs {
    /// Path to save result as NetCDF. If not set, prints to terminal.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}
