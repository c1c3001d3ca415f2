use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("输入文件不存在: {}", .path.display())]
    InputNotFound { path: PathBuf },

    #[error(
        "输入文件引用了变量 ({})，但环境文件 {} 缺失或无效: {reason}",
        .variables.join(", "),
        .path.display()
    )]
    MissingEnvironment {
        variables: Vec<String>,
        path: PathBuf,
        reason: String,
    },

    #[error("环境文件解析失败 {}: {reason}", .path.display())]
    InvalidEnvironment { path: PathBuf, reason: String },

    #[error("配置错误: {0}")]
    Config(String),

    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON 错误: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<toml::de::Error> for ConvertError {
    fn from(err: toml::de::Error) -> Self {
        ConvertError::Config(err.to_string())
    }
}

/// Result type for http2postman crate
pub type Result<T> = std::result::Result<T, ConvertError>;
