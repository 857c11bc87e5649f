use thiserror::Error;

#[derive(Error, Debug)]
pub enum LitScoutError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Taxonomy error: {0}")]
    Taxonomy(String),

    #[error("Connector error: {0}")]
    Connector(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Notification error: {0}")]
    Notify(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}
