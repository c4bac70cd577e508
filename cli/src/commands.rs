pub mod discover;

use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Parser};
use snapr_common::config::{Config, DEFAULT_CONCURRENCY, DEFAULT_DNS_PORT};
use snapr_common::network::server::TrustedServer;

#[derive(Parser)]
#[command(name = "snapr")]
#[command(version)]
#[command(about = "Finds DNS resolvers that answer like the trusted ones.")]
pub struct CommandLine {
    /// File containing list of targets, one per line
    #[arg(short = 'f', long = "file", value_name = "PATH")]
    pub targets_file: Option<PathBuf>,

    /// Number of targets probed at the same time
    #[arg(short = 't', long = "threads", default_value_t = DEFAULT_CONCURRENCY)]
    pub threads: usize,

    /// Comma separated list of known domains
    #[arg(short, long, value_delimiter = ',', default_value = "terra.com.br")]
    pub domains: Vec<String>,

    /// Comma separated list of trusted resolvers (ip or ip:port)
    #[arg(short, long, value_delimiter = ',', default_value = "1.1.1.1,8.8.8.8")]
    pub servers: Vec<TrustedServer>,

    /// Seconds to wait for each answer
    #[arg(long, value_name = "SECS", default_value_t = 3)]
    pub timeout: u64,

    /// DNS port queried on every target
    #[arg(short, long, default_value_t = DEFAULT_DNS_PORT)]
    pub port: u16,

    /// Less output: -q hides decoration and progress, -qq also hides warnings
    #[arg(short, long, action = ArgAction::Count)]
    pub quiet: u8,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn to_config(&self) -> Config {
        Config {
            concurrency: self.threads,
            domains: self
                .domains
                .iter()
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty())
                .collect(),
            trusted_servers: self
                .servers
                .iter()
                .map(|s| s.with_default_port(self.port))
                .collect(),
            dns_port: self.port,
            timeout: Duration::from_secs(self.timeout),
            quiet: self.quiet,
        }
    }
}
