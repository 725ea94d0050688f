use thiserror::Error;

#[derive(Error, Debug)]
pub enum RankError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("No element produced selector: {0}")]
    SelectorNotFound(String),
}

impl RankError {
    /// Get an actionable hint for how to resolve this error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            RankError::InvalidInput(_) => Some(
                "The document must be UTF-8 encoded text. Re-save the page as UTF-8, or pipe it through iconv"
            ),
            RankError::TomlError(_) | RankError::ConfigError(_) => Some(
                "Check your configuration with `assetrank config`\nOr point ASSETRANK_CONFIG at a different file"
            ),
            RankError::SelectorNotFound(_) => Some(
                "Run `assetrank rank <file>` to list the selectors generated for this page"
            ),
            RankError::IoError(_) => Some(
                "Check that the file exists and is readable, or pass `-` to read from stdin"
            ),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, RankError>;
