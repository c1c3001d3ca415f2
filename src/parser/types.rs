use std::fmt;
use std::str::FromStr;

use crate::variable::VariableTable;

/// 支持的 HTTP 方法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Put,
    Post,
    Delete,
    Options,
}

impl FromStr for Method {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GET" => Ok(Method::Get),
            "PUT" => Ok(Method::Put),
            "POST" => Ok(Method::Post),
            "DELETE" => Ok(Method::Delete),
            "OPTIONS" => Ok(Method::Options),
            _ => Err(format!("Invalid HTTP method: {}", s)),
        }
    }
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Put => "PUT",
            Method::Post => "POST",
            Method::Delete => "DELETE",
            Method::Options => "OPTIONS",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 单个 Header，保持文件中的原始顺序
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub key: String,
    pub value: String,
}

impl Header {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// 请求体，目前只有 JSON 原文一种
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestBody {
    /// 重建后的 JSON 原文
    pub raw: String,

    /// 内容语言提示
    pub language: String,
}

impl RequestBody {
    pub fn json(raw: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            language: "json".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryParam {
    pub key: String,
    pub value: String,
}

/// 路径变量，`{{id}}` 改写成 `:id` 后记录在这里
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathVariable {
    pub key: String,
    pub value: String,
}

/// 拆解后的 URL
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedUrl {
    pub raw: String,
    pub protocol: Option<String>,
    pub host: Vec<String>,
    pub path: Vec<String>,
    pub query: Vec<QueryParam>,
    pub variables: Vec<PathVariable>,
}

/// 单个解析完成（已封存）的请求
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRequest {
    /// 显示名称：`# @name`、分隔符后的名称，或自动生成的 `request-N`
    pub name: String,

    /// `//` 注释给出的描述
    pub description: Option<String>,

    pub method: Method,

    pub url: ParsedUrl,

    /// Headers 列表，保持原始顺序
    pub headers: Vec<Header>,

    pub body: Option<RequestBody>,

    /// 方法行所在的行号（用于日志）
    pub line_number: usize,
}

impl ParsedRequest {
    /// 是否可以输出：URL 不能为空
    pub fn is_complete(&self) -> bool {
        !self.url.raw.is_empty()
    }
}

/// `# @group_name` 声明的分组
#[derive(Debug, Clone, PartialEq)]
pub struct RequestGroup {
    pub name: String,
    pub requests: Vec<ParsedRequest>,
}

impl RequestGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            requests: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }
}

/// 整个文件的解析结果
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParsedFile {
    /// 不属于任何分组的请求
    pub requests: Vec<ParsedRequest>,

    /// 非空分组，按声明顺序
    pub groups: Vec<RequestGroup>,

    /// 文件中是否出现过 `# @group_name`
    pub grouped: bool,

    /// `@name = value` 声明的局部变量
    pub local_variables: VariableTable,
}

impl ParsedFile {
    pub fn new() -> Self {
        Self::default()
    }
}
