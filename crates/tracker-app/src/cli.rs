//! CLI argument definitions for the activity tracker.
//!
//! Priority resolution: CLI args > env vars > config file > defaults.

use clap::Parser;
use std::path::PathBuf;

/// Activity tracker - an in-memory activity service with a function-calling plugin.
#[derive(Parser, Debug)]
#[command(name = "activity-tracker", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Address to bind the API server to.
    #[arg(long = "host")]
    pub host: Option<String>,

    /// API server port.
    #[arg(short = 'p', long = "port")]
    pub port: Option<u16>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > TRACKER_CONFIG env var > ~/.activity-tracker/config.toml.
    pub fn resolve_config_path(&self) -> PathBuf {
        self.resolve_config_path_from(std::env::var("TRACKER_CONFIG").ok())
    }

    fn resolve_config_path_from(&self, env_value: Option<String>) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Some(p) = env_value.filter(|p| !p.is_empty()) {
            return PathBuf::from(p);
        }
        default_config_path()
    }

    /// Resolve the API server port.
    ///
    /// Priority: --port flag > TRACKER_PORT env var > config file value.
    pub fn resolve_port(&self, config_port: u16) -> u16 {
        self.resolve_port_from(std::env::var("TRACKER_PORT").ok(), config_port)
    }

    fn resolve_port_from(&self, env_value: Option<String>, config_port: u16) -> u16 {
        if let Some(p) = self.port {
            return p;
        }
        if let Some(p) = env_value.and_then(|v| v.parse::<u16>().ok()) {
            return p;
        }
        config_port
    }

    /// Resolve the bind host. Priority: --host flag > config file value.
    pub fn resolve_host(&self, config_host: &str) -> String {
        self.host
            .clone()
            .unwrap_or_else(|| config_host.to_string())
    }

    /// Resolve the log level. Priority: --log-level flag > config file value.
    pub fn resolve_log_level(&self, config_level: &str) -> String {
        self.log_level
            .clone()
            .unwrap_or_else(|| config_level.to_string())
    }
}

/// Default config file path for the current platform.
fn default_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    if let Ok(home) = std::env::var("USERPROFILE") {
        return PathBuf::from(home).join(".activity-tracker").join("config.toml");
    }
    #[cfg(not(target_os = "windows"))]
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".activity-tracker").join("config.toml");
    }
    PathBuf::from("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliArgs {
        CliArgs::parse_from(std::iter::once("activity-tracker").chain(args.iter().copied()))
    }

    #[test]
    fn test_parse_all_flags() {
        let cli = parse(&["-c", "/tmp/t.toml", "--host", "0.0.0.0", "-p", "9000", "-l", "debug"]);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/t.toml")));
        assert_eq!(cli.host.as_deref(), Some("0.0.0.0"));
        assert_eq!(cli.port, Some(9000));
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_config_path_priority() {
        let cli = parse(&["--config", "flag.toml"]);
        assert_eq!(
            cli.resolve_config_path_from(Some("env.toml".into())),
            PathBuf::from("flag.toml")
        );

        let cli = parse(&[]);
        assert_eq!(
            cli.resolve_config_path_from(Some("env.toml".into())),
            PathBuf::from("env.toml")
        );
        assert_eq!(cli.resolve_config_path_from(None), default_config_path());
    }

    #[test]
    fn test_port_priority() {
        let cli = parse(&["--port", "7000"]);
        assert_eq!(cli.resolve_port_from(Some("8000".into()), 5080), 7000);

        let cli = parse(&[]);
        assert_eq!(cli.resolve_port_from(Some("8000".into()), 5080), 8000);
        assert_eq!(cli.resolve_port_from(Some("not-a-port".into()), 5080), 5080);
        assert_eq!(cli.resolve_port_from(None, 5080), 5080);
    }

    #[test]
    fn test_host_and_log_level_fall_back_to_config() {
        let cli = parse(&[]);
        assert_eq!(cli.resolve_host("127.0.0.1"), "127.0.0.1");
        assert_eq!(cli.resolve_log_level("warn"), "warn");

        let cli = parse(&["--host", "0.0.0.0", "-l", "trace"]);
        assert_eq!(cli.resolve_host("127.0.0.1"), "0.0.0.0");
        assert_eq!(cli.resolve_log_level("warn"), "trace");
    }
}
