mod category;
mod error;
mod identifier;
mod platform;
mod result;
mod transport;

pub use category::{Category, classify};
pub use error::{RelinkError, RelinkResult};
pub use identifier::extract_id;
pub use platform::{Platform, detect_platform};
pub use result::ConvertedLink;
pub use transport::encode_for_transport;

pub fn validate_url(url: &str) -> RelinkResult<()> {
    url::Url::parse(url).map_err(|err| RelinkError::InvalidInput(format!("invalid url: {err}")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::validate_url;
    use crate::RelinkError;

    #[test]
    fn test_validate_url_valid() {
        assert!(validate_url("http://127.0.0.1:8000").is_ok());
        assert!(validate_url("https://tidal.com/browse/track/126102208?u").is_ok());
    }

    #[test]
    fn test_validate_url_error_message() {
        let result = validate_url("://no-scheme");
        match result {
            Err(RelinkError::InvalidInput(msg)) => assert!(msg.contains("invalid url")),
            _ => panic!("Expected InvalidInput error"),
        }
    }
}
