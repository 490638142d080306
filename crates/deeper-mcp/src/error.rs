//! Startup errors with miette diagnostics.

use miette::Diagnostic;
use thiserror::Error;

use deeper_config::ConfigError;

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const CONFIG: i32 = 2;
}

#[derive(Debug, Error, Diagnostic)]
pub enum McpError {
    #[error("Configuration error")]
    #[diagnostic(
        code(deeper::config),
        help(
            "Check the config file and DEEPER_* environment variables.\n\
             Default location: {path}\n\
             Run: deeper-mcp --print-config"
        )
    )]
    Config {
        path: String,
        #[source]
        source: ConfigError,
    },

    #[error("stdio transport failed")]
    #[diagnostic(code(deeper::io))]
    Io(#[from] std::io::Error),
}

impl McpError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config { .. } => exit_code::CONFIG,
            Self::Io(_) => exit_code::GENERAL,
        }
    }
}

impl From<ConfigError> for McpError {
    fn from(source: ConfigError) -> Self {
        Self::Config {
            path: deeper_config::config_path().display().to_string(),
            source,
        }
    }
}
