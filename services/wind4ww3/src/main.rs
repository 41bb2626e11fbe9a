//! wind4ww3: merge a directory of ERA5, CFSR or GFS surface wind files into a
//! single WAVEWATCH III `sflux_air.ww3.nc` forcing file.

mod config;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

use config::{CliSettings, FileConfig};
use wind_archive::ArchiveSource;

#[derive(Parser, Debug)]
#[command(name = "wind4ww3")]
#[command(about = "Merge surface wind archives into a WAVEWATCH III sflux_air forcing file")]
struct Args {
    /// Archive the input files come from: era5, cfsr or gfs
    #[arg(value_name = "ARCHIVE")]
    source: ArchiveSource,

    /// Directory holding the input files
    #[arg(short, long, env = "WIND4WW3_INPUT_DIR")]
    input_dir: Option<PathBuf>,

    /// Output file path
    #[arg(short, long, env = "WIND4WW3_OUTPUT")]
    output: Option<PathBuf>,

    /// Input file extension
    #[arg(long, env = "WIND4WW3_EXTENSION")]
    extension: Option<String>,

    /// YAML configuration file
    #[arg(short, long, env = "WIND4WW3_CONFIG")]
    config: Option<PathBuf>,

    /// Log level
    #[arg(long, env = "WIND4WW3_LOG", default_value = "info")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level, args.json_logs)?;
    netcdf_store::silence_hdf5_errors();

    let file_config = args.config.as_deref().map(FileConfig::load).transpose()?;
    if let Some(path) = &args.config {
        debug!(path = %path.display(), "Loaded configuration file");
    }

    let cli = CliSettings {
        input_dir: args.input_dir,
        output: args.output,
        extension: args.extension,
    };
    let job = config::resolve(args.source, cli, file_config);
    debug!(?job, "Resolved merge job");

    let summary = wind_archive::run(&job)?;
    info!(
        files = summary.files.len(),
        time_steps = summary.time_steps,
        rows = summary.rows,
        cols = summary.cols,
        "Merge complete"
    );

    println!("{} saved", summary.output.display());
    Ok(())
}

/// Logs go to stderr; stdout only carries the final confirmation.
fn init_tracing(log_level: &str, json: bool) -> Result<()> {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr);

    if json {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }
    Ok(())
}
