use crate::collection::CollectionAssembler;
use crate::error::{ConvertError, Result};
use crate::parser::Dialect;
use crate::variable::EnvironmentLoader;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// 配置文件内容，所有字段都可省略
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct ConverterConfig {
    /// 使用的环境名称
    pub environment: Option<String>,

    /// 环境文件路径（相对路径以配置文件所在目录为基准）
    pub environment_file: Option<PathBuf>,

    /// collection 名称前缀
    pub name_prefix: Option<String>,

    /// 是否使用精简语法
    pub legacy: Option<bool>,

    /// 是否替换 Header 中的变量
    pub substitute_header_variables: Option<bool>,
}

/// 一次转换的完整选项
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConverterOptions {
    pub environment: String,

    /// 为空时使用输入文件旁边的 `http-client.env.json`
    pub environment_file: Option<PathBuf>,

    pub name_prefix: String,

    pub dialect: Dialect,

    pub substitute_header_variables: bool,
}

impl Default for ConverterOptions {
    fn default() -> Self {
        Self {
            environment: EnvironmentLoader::DEFAULT_ENVIRONMENT.to_string(),
            environment_file: None,
            name_prefix: CollectionAssembler::DEFAULT_NAME_PREFIX.to_string(),
            dialect: Dialect::Full,
            substitute_header_variables: false,
        }
    }
}

impl ConverterOptions {
    /// 用配置文件中出现的字段覆盖当前选项
    pub fn merge_config(mut self, config: &ConverterConfig) -> Self {
        if let Some(environment) = &config.environment {
            self.environment = environment.clone();
        }
        if let Some(path) = &config.environment_file {
            self.environment_file = Some(path.clone());
        }
        if let Some(prefix) = &config.name_prefix {
            self.name_prefix = prefix.clone();
        }
        if let Some(legacy) = config.legacy {
            self.dialect = if legacy { Dialect::Legacy } else { Dialect::Full };
        }
        if let Some(substitute) = config.substitute_header_variables {
            self.substitute_header_variables = substitute;
        }
        self
    }

    /// 输入文件对应的环境文件路径
    pub fn environment_path<P: AsRef<Path>>(&self, input: P) -> PathBuf {
        self.environment_file
            .clone()
            .unwrap_or_else(|| EnvironmentLoader::default_path(input))
    }
}

/// 配置文件加载器
pub struct ConfigLoader;

impl ConfigLoader {
    /// 配置文件名
    const CONFIG_FILE: &'static str = "http2postman.toml";

    /// 从指定路径加载配置文件
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<ConverterConfig> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            ConvertError::Config(format!("无法读取 {}: {}", path.display(), e))
        })?;

        let mut config: ConverterConfig = toml::from_str(&content)?;

        // 相对的环境文件路径以配置文件所在目录为基准
        if let (Some(env_file), Some(dir)) = (&config.environment_file, path.parent())
            && env_file.is_relative()
        {
            config.environment_file = Some(dir.join(env_file));
        }

        Ok(config)
    }

    /// 查找并加载配置文件
    /// 查找顺序：
    /// 1. 当前目录及其父目录
    /// 2. 用户配置目录 ~/.config/http2postman/
    pub fn find_and_load() -> Option<ConverterConfig> {
        if let Some(config) = Self::try_load_from_current_dir() {
            return Some(config);
        }

        Self::try_load_from_user_dir()
    }

    /// 尝试从当前目录及其父目录加载
    fn try_load_from_current_dir() -> Option<ConverterConfig> {
        let mut current = std::env::current_dir().ok()?;

        loop {
            let config_path = current.join(Self::CONFIG_FILE);
            if config_path.exists() {
                return Self::load_logged(&config_path);
            }

            // 尝试父目录
            if !current.pop() {
                break;
            }
        }

        None
    }

    /// 尝试从用户配置目录加载
    fn try_load_from_user_dir() -> Option<ConverterConfig> {
        let home = dirs::home_dir()?;
        let config_path = home
            .join(".config")
            .join("http2postman")
            .join(Self::CONFIG_FILE);

        if config_path.exists() {
            Self::load_logged(&config_path)
        } else {
            None
        }
    }

    fn load_logged(path: &Path) -> Option<ConverterConfig> {
        match Self::load_from_path(path) {
            Ok(config) => {
                tracing::debug!(path = %path.display(), "Loaded config file");
                Some(config)
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Ignoring invalid config file");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_options() {
        let options = ConverterOptions::default();
        assert_eq!(options.environment, "dev");
        assert_eq!(options.name_prefix, "jb-export-");
        assert_eq!(options.dialect, Dialect::Full);
        assert!(!options.substitute_header_variables);
        assert_eq!(
            options.environment_path("/work/api.http"),
            PathBuf::from("/work/http-client.env.json")
        );
    }

    #[test]
    fn test_load_from_path_resolves_relative_env_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("http2postman.toml");
        fs::write(
            &config_path,
            r#"
environment = "staging"
environment_file = "envs/http-client.env.json"
name_prefix = "team-"
legacy = true
"#,
        )
        .unwrap();

        let config = ConfigLoader::load_from_path(&config_path).unwrap();
        assert_eq!(config.environment.as_deref(), Some("staging"));
        assert_eq!(
            config.environment_file,
            Some(temp_dir.path().join("envs/http-client.env.json"))
        );

        let options = ConverterOptions::default().merge_config(&config);
        assert_eq!(options.environment, "staging");
        assert_eq!(options.name_prefix, "team-");
        assert_eq!(options.dialect, Dialect::Legacy);
        assert!(!options.substitute_header_variables);
    }

    #[test]
    fn test_load_rejects_unknown_keys() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("http2postman.toml");
        fs::write(&config_path, "enviroment = \"typo\"\n").unwrap();

        let result = ConfigLoader::load_from_path(&config_path);
        assert!(matches!(result, Err(ConvertError::Config(_))));
    }

    #[test]
    fn test_merge_empty_config_keeps_defaults() {
        let options = ConverterOptions::default().merge_config(&ConverterConfig::default());
        assert_eq!(options, ConverterOptions::default());
    }
}
