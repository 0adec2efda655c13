//! movie-splitcat CLI: cut manifest segments out of videos and join them.
//!
//! Usage:
//!   movie-splitcat [MANIFEST] [SOURCE_DIR] [TEMP_DIR]
//!
//! Each `<id>_*.mp4` in SOURCE_DIR whose id is listed in MANIFEST is cut
//! into TEMP_DIR, then all clips are joined into `./output.mkv`.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use splitcat_common::config::SplitcatConfig;
use splitcat_transcode::{run_pipeline, FfmpegRunner, PipelinePaths};

#[derive(Parser)]
#[command(
    name = "movie-splitcat",
    about = "Cut the segments listed in a split manifest out of source videos and join them",
    version,
    author
)]
struct Cli {
    /// Tab-separated split manifest
    #[arg(default_value = "./split.txt")]
    manifest: PathBuf,

    /// Directory holding the `<id>_*.mp4` source videos
    #[arg(default_value = ".")]
    source_dir: PathBuf,

    /// Directory for extracted clips and the concat list
    #[arg(default_value = ".")]
    temp_dir: PathBuf,
}

impl Cli {
    fn into_paths(self) -> PipelinePaths {
        PipelinePaths {
            manifest: self.manifest,
            source_dir: self.source_dir,
            temp_dir: self.temp_dir,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let (config, config_error) = SplitcatConfig::load();
    let _logging = match splitcat_common::logging::init_logging(&config.logging) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("movie-splitcat: {e}");
            return ExitCode::FAILURE;
        }
    };
    if let Some(err) = config_error {
        tracing::warn!(error = %err, "Ignoring unusable config file, using defaults");
    }

    match run(cli.into_paths(), &config).await {
        Ok(output) => {
            println!("Wrote {}", output.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("movie-splitcat: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(paths: PipelinePaths, config: &SplitcatConfig) -> anyhow::Result<PathBuf> {
    let runner = FfmpegRunner::new(&config.ffmpeg_path);
    let output = run_pipeline(&paths, &runner).await?;
    Ok(output)
}
