//! All the CLI arguments for the rig

/// The name of the config file in the config directory.
pub(crate) const DEFAULT_CONFIG_FILE_NAME: &str = "rig.toml";

/// Ready-made physics.
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Preset {
    /// Use whatever is in the config file
    Config,
    /// A narrower, slightly weaker spray
    Playground,
}

/// Poke a gushing oil rig from your terminal.
#[derive(clap::Parser, Debug, Clone)]
#[command(
    version,
    about,
    long_about = "Poke a gushing oil rig from your terminal.\n\n\
        Commands are read from STDIN, one per line: `click`, `hover`, `key <name>`, \
        `motion <reduce|no-preference|unknown>` and `quit`. Every change to the rig is \
        written to STDOUT as a line of JSON."
)]
#[non_exhaustive]
pub(crate) struct CliArgs {
    /// Path to the config directory. Defaults to your system's config directory.
    #[arg(long)]
    pub config_dir: Option<std::path::PathBuf>,

    /// Name of the config file inside the config directory.
    #[arg(long, default_value = DEFAULT_CONFIG_FILE_NAME)]
    pub main_config: std::path::PathBuf,

    /// Override the log level from the config.
    #[arg(long, value_enum)]
    pub log_level: Option<crate::config::main::LogLevel>,

    /// Override the log path from the config.
    #[arg(long)]
    pub log_path: Option<std::path::PathBuf>,

    /// Poke the rig every this many milliseconds. Overrides the config.
    #[arg(long)]
    pub auto_erupt: Option<u64>,

    /// Seed the random droplets, for reproducible sprays.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Which physics to use.
    #[arg(long, value_enum, default_value_t = Preset::Config)]
    pub preset: Preset,
}
