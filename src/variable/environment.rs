use crate::error::{ConvertError, Result};
use crate::variable::types::EnvironmentFile;
use std::fs;
use std::path::{Path, PathBuf};

/// 环境文件加载器
pub struct EnvironmentLoader;

impl EnvironmentLoader {
    /// 环境文件名，与输入文件放在同一目录
    pub const ENV_FILE: &'static str = "http-client.env.json";

    /// 默认环境名称
    pub const DEFAULT_ENVIRONMENT: &'static str = "dev";

    /// 输入文件旁边的环境文件路径
    pub fn default_path<P: AsRef<Path>>(input: P) -> PathBuf {
        input
            .as_ref()
            .parent()
            .unwrap_or_else(|| Path::new(""))
            .join(Self::ENV_FILE)
    }

    /// 从指定路径加载环境文件，文件不存在或不是合法 JSON 时返回错误
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<EnvironmentFile> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;

        serde_json::from_str(&content).map_err(|e| ConvertError::InvalidEnvironment {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }
}
