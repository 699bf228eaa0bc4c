use thiserror::Error;

use crate::Category;

#[derive(Debug, Error)]
pub enum RelinkError {
    #[error("unsupported input: {0}")]
    UnsupportedInput(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("no /{category}/ segment in {url}")]
    MissingSegment { category: Category, url: String },
    #[error("a conversion is already in progress")]
    Busy,
    #[error("configuration error: {0}")]
    Config(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("api error: status={status} body={body}")]
    Api { status: u16, body: String },
    #[error("parse error: {0}")]
    Parse(String),
    #[error("backend returned no converted links")]
    EmptyResponse,
    #[error("runtime error: {0}")]
    Runtime(String),
    #[error("clipboard error: {0}")]
    Clipboard(String),
}

pub type RelinkResult<T> = Result<T, RelinkError>;
