// FILE: src/cli/mod.rs

mod config;
mod handlers;

pub use config::ConfigFile;
pub use handlers::{resolve_targets, RunOptions};

use crate::error::Result;
use crate::watch::DEFAULT_DEBOUNCE_MS;
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::ffi::OsString;
use std::time::Duration;

pub struct RoutesCli {
    config: ConfigFile,
}

impl Default for RoutesCli {
    fn default() -> Self {
        Self::new()
    }
}

impl RoutesCli {
    pub fn new() -> Self {
        Self {
            config: ConfigFile::default(),
        }
    }

    pub fn run(&mut self) -> Result<()> {
        let matches = self.build_cli().get_matches();
        self.setup_logging(matches.get_count("verbose"));
        self.execute(&matches)
    }

    /// Same as [`RoutesCli::run`] with explicit arguments and no logger setup.
    pub fn run_from<I, T>(&mut self, args: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = self.build_cli().get_matches_from(args);
        self.execute(&matches)
    }

    fn execute(&mut self, matches: &ArgMatches) -> Result<()> {
        if let Some(config_path) = matches.get_one::<String>("config") {
            self.config = config::load(config_path)?;
        }
        let paths: Vec<String> = matches
            .get_many::<String>("paths")
            .map(|paths| paths.cloned().collect())
            .unwrap_or_default();
        let targets = resolve_targets(&paths)?;
        handlers::handle_generate(&targets, &self.run_options(matches))
    }

    /// Usage block printed after a fatal error.
    pub fn usage(&self) -> String {
        self.build_cli().render_usage().to_string()
    }

    pub fn build_cli(&self) -> Command {
        Command::new(crate::NAME)
            .version(crate::VERSION)
            .about(crate::DESCRIPTION)
            .arg(
                Arg::new("config")
                    .short('c')
                    .long("config")
                    .value_name("FILE")
                    .help("Configuration file path (.json or .toml)")
                    .action(ArgAction::Set),
            )
            .arg(
                Arg::new("verbose")
                    .short('v')
                    .long("verbose")
                    .help("Increase verbosity (can be used multiple times)")
                    .action(ArgAction::Count),
            )
            .arg(
                Arg::new("watch")
                    .short('w')
                    .long("watch")
                    .help("Keep watching the folders and regenerate on changes")
                    .action(ArgAction::SetTrue),
            )
            .arg(
                Arg::new("exec")
                    .short('x')
                    .long("exec")
                    .value_name("CMD")
                    .help("Shell command to run after each generation that wrote files")
                    .action(ArgAction::Set),
            )
            .arg(
                Arg::new("debounce")
                    .long("debounce")
                    .value_name("MS")
                    .help("Quiet period before regenerating, in milliseconds")
                    .value_parser(clap::value_parser!(u64))
                    .action(ArgAction::Set),
            )
            .arg(
                Arg::new("stats")
                    .long("stats")
                    .help("Print generation statistics as JSON")
                    .action(ArgAction::SetTrue),
            )
            .arg(
                Arg::new("paths")
                    .value_name("PATH")
                    .help("Folders holding the route tree")
                    .required(true)
                    .num_args(1..)
                    .index(1)
                    .action(ArgAction::Append),
            )
    }

    fn setup_logging(&self, verbose_count: u8) {
        let log_level = match verbose_count {
            0 => log::LevelFilter::Info,
            1 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        };
        env_logger::Builder::from_default_env()
            .filter_level(log_level)
            .format_timestamp_secs()
            .init();
    }

    pub fn run_options(&self, matches: &ArgMatches) -> RunOptions {
        let debounce_ms = matches
            .get_one::<u64>("debounce")
            .copied()
            .or(self.config.debounce_ms)
            .unwrap_or(DEFAULT_DEBOUNCE_MS);
        RunOptions {
            watch: matches.get_flag("watch") || self.config.watch.unwrap_or(false),
            debounce: Duration::from_millis(debounce_ms),
            exec: matches
                .get_one::<String>("exec")
                .cloned()
                .or_else(|| self.config.exec.clone()),
            stats: matches.get_flag("stats") || self.config.stats.unwrap_or(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RouteError;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_parse_flags() {
        let cli = RoutesCli::new();
        let matches = cli
            .build_cli()
            .try_get_matches_from(["fsroutes", "-vv", "-w", "--debounce", "50", "-x", "make", "src/app", "src/admin"])
            .unwrap();
        assert_eq!(matches.get_count("verbose"), 2);

        let options = cli.run_options(&matches);
        assert!(options.watch);
        assert!(!options.stats);
        assert_eq!(options.debounce, Duration::from_millis(50));
        assert_eq!(options.exec.as_deref(), Some("make"));

        let paths: Vec<&String> = matches.get_many::<String>("paths").unwrap().collect();
        assert_eq!(paths, ["src/app", "src/admin"]);
    }

    #[test]
    fn test_path_is_mandatory() {
        let cli = RoutesCli::new();
        assert!(cli.build_cli().try_get_matches_from(["fsroutes"]).is_err());
        assert!(cli
            .build_cli()
            .try_get_matches_from(["fsroutes", "--bogus", "app"])
            .is_err());
    }

    #[test]
    fn test_flags_override_config() {
        let mut cli = RoutesCli::new();
        cli.config = ConfigFile {
            watch: Some(true),
            debounce_ms: Some(1000),
            exec: Some("from-config".to_string()),
            stats: None,
        };
        let matches = cli
            .build_cli()
            .try_get_matches_from(["fsroutes", "--debounce", "20", "app"])
            .unwrap();
        let options = cli.run_options(&matches);
        assert!(options.watch);
        assert_eq!(options.debounce, Duration::from_millis(20));
        assert_eq!(options.exec.as_deref(), Some("from-config"));

        let matches = cli.build_cli().try_get_matches_from(["fsroutes", "app"]).unwrap();
        assert_eq!(cli.run_options(&matches).debounce, Duration::from_millis(1000));
    }

    #[test]
    fn test_run_generates_once() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("page.tsx"), "").unwrap();

        let mut cli = RoutesCli::new();
        let root = temp_dir.path().to_string_lossy().into_owned();
        cli.run_from(["fsroutes", root.as_str()]).unwrap();
        assert!(temp_dir.path().join("index.tsx").exists());

        let missing = temp_dir.path().join("missing").to_string_lossy().into_owned();
        let err = cli.run_from(["fsroutes", missing.as_str()]).unwrap_err();
        assert!(matches!(err, RouteError::PathNotFound { .. }));
        assert!(err.is_usage_error());
        assert!(cli.usage().contains("PATH"));
    }
}
