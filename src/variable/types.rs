use serde::Deserialize;
use std::collections::HashMap;

/// 有序变量表
///
/// 保持首次声明的顺序，重复写入时原地覆盖（后写覆盖先写）。
/// 用于文件内 `@name = value` 声明和请求脚本里 `request.variables.set` 的变量。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableTable {
    entries: Vec<(String, String)>,
}

impl VariableTable {
    /// 创建新的空变量表
    pub fn new() -> Self {
        Self::default()
    }

    /// 插入变量，已存在则覆盖值但保持原位置
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// 获取变量值
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// 按声明顺序遍历
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// 变量数量
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// 单个环境的变量映射
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
pub struct Environment {
    #[serde(flatten)]
    pub variables: HashMap<String, String>,
}

impl Environment {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.variables.get(key).map(|s| s.as_str())
    }
}

/// `http-client.env.json` 的完整内容：环境名 → (变量名 → 值)
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct EnvironmentFile {
    pub environments: HashMap<String, Environment>,
}

impl EnvironmentFile {
    /// 获取指定环境的变量
    pub fn get_environment(&self, env_name: &str) -> Option<&Environment> {
        self.environments.get(env_name)
    }
}
