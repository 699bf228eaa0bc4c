pub mod backend;

pub use backend::{BackendClient, ConversionBackend, ConvertResponse};
