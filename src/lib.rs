pub mod collection;
pub mod config;
pub mod converter;
pub mod error;
pub mod logger;
pub mod parser;
pub mod variable;

// Re-export commonly used types
pub use config::{ConfigLoader, ConverterConfig, ConverterOptions};
pub use converter::{ConversionSummary, Converter};
pub use error::{ConvertError, Result};
