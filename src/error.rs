use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Rejected growth parameters
#[derive(Debug, Error, PartialEq)]
pub enum ParamError {
    #[error("{name} must be a finite number, got {value}")]
    NotFinite { name: &'static str, value: f64 },
    #[error("{name} must lie strictly between 0 and 1, got {value}")]
    FactorOutOfRange { name: &'static str, value: f64 },
    #[error("start length must be positive, got {0}")]
    NonPositiveLength(f64),
    #[error("branch factor must be at least 1")]
    ZeroBranchFactor,
    #[error("terminal depth {terminal} is below start depth {start}")]
    TerminalBelowStart { start: u32, terminal: u32 },
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("invalid tree parameters: {0}")]
    Params(#[from] ParamError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
}

pub type Result<T> = std::result::Result<T, Error>;
