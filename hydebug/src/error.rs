use thiserror::Error;

#[derive(Debug, Error)]
pub enum DebugError {
    #[error("I/O error on debug stream '{name}': {source}")]
    Io {
        source: std::io::Error,
        name: String,
    },

    #[error("No such debug stream '{0}'")]
    NoSuchStream(String),

    #[error("A debug stream named '{0}' is already registered")]
    StreamAlreadyRegistered(String),

    #[error("Failed to read debug configuration file '{file}': {source}")]
    ConfigRead {
        source: std::io::Error,
        file: String,
    },

    #[error("Failed to parse debug configuration '{file}': {source}")]
    ConfigParse {
        source: toml::de::Error,
        file: String,
    },
}

pub type DebugResult<T> = Result<T, DebugError>;
