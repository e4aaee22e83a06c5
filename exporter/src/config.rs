use std::path::PathBuf;

#[derive(Debug, clap::Parser)]
#[command(name = "exporter", about = "Exports per-round statistics of CS2 demos as JSON")]
pub struct Cli {
    /// Demo files, or directories to scan for `.dem` files
    #[arg(default_value = ".")]
    pub paths: Vec<PathBuf>,

    /// Only process demos that have no export yet
    #[arg(long = "new")]
    pub new_only: bool,

    /// Number of demos processed at the same time
    #[arg(long, short = 'j', default_value_t = 6)]
    pub jobs: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub paths: Vec<PathBuf>,
    pub skip_existing: bool,
    pub jobs: usize,
}

impl From<Cli> for Config {
    fn from(cli: Cli) -> Self {
        Self {
            paths: cli.paths,
            skip_existing: cli.new_only,
            jobs: cli.jobs.max(1),
        }
    }
}
