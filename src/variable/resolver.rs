use crate::variable::types::{Environment, VariableTable};
use regex::{Captures, Regex};
use std::sync::OnceLock;

/// `{{name}}` 变量引用的匹配规则
fn var_regex() -> &'static Regex {
    static VAR_REGEX: OnceLock<Regex> = OnceLock::new();
    VAR_REGEX.get_or_init(|| Regex::new(r"\{\{(\w+)\}\}").unwrap())
}

/// 预扫描：找出文本中所有 `{{variable}}` 引用
///
/// 扫描的是原始全文，与行分类无关，URL、Header、JSON Body 中的引用都会被找到。
/// 结果按首次出现的顺序排列，保留重复项，去重由组装阶段负责。
pub fn detect_variables(text: &str) -> Vec<String> {
    var_regex()
        .captures_iter(text)
        .map(|caps| caps[1].to_string())
        .collect()
}

/// 变量替换器
///
/// 取值优先级：文件内局部变量 > 当前环境变量。都找不到时保留原样。
pub struct VariableResolver<'a> {
    locals: &'a VariableTable,
    environment: Option<&'a Environment>,
}

impl<'a> VariableResolver<'a> {
    pub fn new(locals: &'a VariableTable, environment: Option<&'a Environment>) -> Self {
        Self {
            locals,
            environment,
        }
    }

    /// 解析单个变量值
    pub fn lookup(&self, name: &str) -> Option<&'a str> {
        self.locals
            .get(name)
            .or_else(|| self.environment.and_then(|env| env.get(name)))
    }

    /// 解析单个变量值，找不到时返回空串
    pub fn resolve_or_empty(&self, name: &str) -> String {
        self.lookup(name).unwrap_or_default().to_string()
    }

    /// 替换文本中的所有 {{variable}} 占位符
    pub fn substitute(&self, text: &str) -> String {
        var_regex()
            .replace_all(text, |caps: &Captures| {
                self.lookup(&caps[1]).unwrap_or(&caps[0]).to_string()
            })
            .to_string()
    }
}

/// 提取单个片段里的所有变量引用，返回 (完整 token, 变量名)
pub(crate) fn variable_tokens(text: &str) -> Vec<(String, String)> {
    var_regex()
        .captures_iter(text)
        .map(|caps| (caps[0].to_string(), caps[1].to_string()))
        .collect()
}
