use thiserror::Error;

pub type ExtResult<T> = Result<T, ExtError>;

#[derive(Error, Debug)]
pub enum ExtError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Path error: {0}")]
    Path(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Manifest error: {0}")]
    Manifest(String),

    #[error("Package error: {0}")]
    Package(String),

    #[error("Profile error: {0}")]
    Profile(String),

    #[error("WalkDir error: {0}")]
    WalkDir(#[from] walkdir::Error),
}
