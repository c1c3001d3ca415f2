pub mod builder;
pub mod line;
pub mod script;
pub mod types;
pub mod url;

// Re-export commonly used types
pub use builder::{BuilderOptions, RequestBuilder};
pub use line::{BuilderState, Dialect, LineKind, classify};
pub use types::{
    Header, Method, ParsedFile, ParsedRequest, ParsedUrl, PathVariable, QueryParam, RequestBody,
    RequestGroup,
};

/// 使用默认选项解析 .http 内容
pub fn parse_content(content: &str) -> ParsedFile {
    RequestBuilder::new(BuilderOptions::default()).build(content)
}
