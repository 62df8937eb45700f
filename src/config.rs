//! Server configuration
//!
//! Command line flags and the per-connection limits derived from them.

use std::path::PathBuf;

use clap::Parser;

/// Default server address
pub const DEFAULT_ADDR: &str = "127.0.0.1:60000";

/// Default largest accepted request body
pub const DEFAULT_MAX_BODY_BYTES: usize = 64 * 1024;

/// Largest accepted request line plus headers
pub const DEFAULT_MAX_HEAD_BYTES: usize = 8 * 1024;

/// Command line arguments
#[derive(Debug, Parser)]
#[command(name = "boggle_server", version, about = "Multiplayer Boggle game server")]
pub struct Args {
    /// Address to listen on
    #[arg(long, default_value = DEFAULT_ADDR)]
    pub addr: String,

    /// Newline-delimited word list
    #[arg(long, default_value = "dictionary.txt")]
    pub dictionary: PathBuf,

    /// Largest accepted request body in bytes
    #[arg(long, default_value_t = DEFAULT_MAX_BODY_BYTES)]
    pub max_body_bytes: usize,
}

/// Limits applied to every connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerConfig {
    pub max_head_bytes: usize,
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            max_head_bytes: DEFAULT_MAX_HEAD_BYTES,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

impl From<&Args> for ServerConfig {
    fn from(args: &Args) -> Self {
        Self {
            max_body_bytes: args.max_body_bytes,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["boggle_server"]);
        assert_eq!(args.addr, DEFAULT_ADDR);
        assert_eq!(args.dictionary, PathBuf::from("dictionary.txt"));
        assert_eq!(ServerConfig::from(&args), ServerConfig::default());
    }

    #[test]
    fn test_overrides() {
        let args = Args::parse_from([
            "boggle_server",
            "--addr",
            "0.0.0.0:9000",
            "--dictionary",
            "/tmp/words.txt",
            "--max-body-bytes",
            "128",
        ]);
        assert_eq!(args.addr, "0.0.0.0:9000");
        assert_eq!(ServerConfig::from(&args).max_body_bytes, 128);
    }
}
