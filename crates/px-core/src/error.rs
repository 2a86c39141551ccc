use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Matrix is singular (determinant {0})")]
    SingularMatrix(f64),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
