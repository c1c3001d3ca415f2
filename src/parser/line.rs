//! 行分类
//!
//! 每一行（去掉首尾空白后）按固定优先级归入唯一一种 [`LineKind`]。
//! 优先级由 [`RULES`] 的顺序决定，第一条匹配的规则生效。

use crate::parser::types::Method;
use once_cell::sync::Lazy;
use regex::Regex;

/// 文件语法方言
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dialect {
    /// 完整语法：分组、名称、局部变量、请求脚本、带名称的分隔符
    #[default]
    Full,

    /// 精简语法：只识别方法行、Header、JSON Body、分隔符和注释
    Legacy,
}

/// 构建器所处的状态，影响部分行的分类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuilderState {
    /// 还没有遇到方法行
    #[default]
    Idle,

    /// 方法行之后，接收 Header
    InHeaders,

    /// JSON Body 尚未闭合
    InJsonBody,

    /// 多行请求脚本 `< {% ... %}` 内部
    InScriptBlock,
}

/// 单行输入
#[derive(Debug, Clone, Copy)]
pub struct Line<'a> {
    /// 从 1 开始的行号
    pub number: usize,

    /// 原始内容（不含换行符）
    pub raw: &'a str,

    /// 去掉首尾空白后的内容
    pub text: &'a str,
}

impl<'a> Line<'a> {
    pub fn new(number: usize, raw: &'a str) -> Self {
        Self {
            number,
            raw,
            text: raw.trim(),
        }
    }
}

/// 行的种类
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind<'a> {
    Blank,

    /// `# @group_name <name>`
    GroupName(&'a str),

    /// `# @name <identifier>`
    RequestName(&'a str),

    /// `// <text>`
    Description(&'a str),

    /// `@name = value`
    LocalVariable { name: &'a str, value: &'a str },

    /// 单行脚本 `< {% ... %}`
    ScriptInline(&'a str),

    /// 多行脚本开始
    ScriptStart(&'a str),

    /// 多行脚本结束（含 `%}`）
    ScriptEnd(&'a str),

    /// 多行脚本内部
    ScriptBody(&'a str),

    /// `###`，可带下一个请求的名称
    Separator(Option<&'a str>),

    /// 其它 `#` 注释
    Comment,

    /// `GET https://...`
    RequestLine { method: Method, url: &'a str },

    /// 以 `{` 开头，开始 JSON Body
    BodyStart(&'a str),

    /// JSON Body 内部的行（原始内容）
    BodyLine(&'a str),

    /// `Key: Value`
    Header { key: &'a str, value: &'a str },

    /// 无法识别，忽略
    Unknown,
}

/// 分类时的上下文
#[derive(Debug, Clone, Copy)]
pub struct ScanContext {
    pub dialect: Dialect,
    pub state: BuilderState,
}

impl ScanContext {
    fn full(&self) -> bool {
        self.dialect == Dialect::Full
    }
}

/// 行匹配用的正则表，进程内只构建一次
struct LinePatterns {
    group: Regex,
    name: Regex,
    description: Regex,
    local_variable: Regex,
    request_line: Regex,
}

static PATTERNS: Lazy<LinePatterns> = Lazy::new(|| LinePatterns {
    group: Regex::new(r"^#\s*@group_name\s+(.+)$").unwrap(),
    name: Regex::new(r"^#\s*@name\s+(\w+)$").unwrap(),
    description: Regex::new(r"^//\s*(.+)$").unwrap(),
    local_variable: Regex::new(r"^@(\w+)\s*=\s*(.+)$").unwrap(),
    request_line: Regex::new(r"^(GET|PUT|POST|DELETE|OPTIONS)\s+(\S+)").unwrap(),
});

/// 请求脚本的起止标记
const SCRIPT_OPEN: &str = "{%";
const SCRIPT_CLOSE: &str = "%}";

/// 请求分隔符
const SEPARATOR: &str = "###";

pub type Rule = for<'a> fn(Line<'a>, &ScanContext) -> Option<LineKind<'a>>;

/// 分类规则，按优先级排列
pub const RULES: &[(&str, Rule)] = &[
    ("blank", blank),
    ("group_name", group_name),
    ("request_name", request_name),
    ("description", description),
    ("local_variable", local_variable),
    ("script_start", script_start),
    ("script_end", script_end),
    ("script_body", script_body),
    ("separator", separator),
    ("comment", comment),
    ("request_line", request_line),
    ("body_line", body_line),
    ("body_start", body_start),
    ("header", header),
];

/// 对一行进行分类
pub fn classify<'a>(line: Line<'a>, ctx: &ScanContext) -> LineKind<'a> {
    RULES
        .iter()
        .find_map(|(_, rule)| rule(line, ctx))
        .unwrap_or(LineKind::Unknown)
}

fn blank<'a>(line: Line<'a>, _: &ScanContext) -> Option<LineKind<'a>> {
    line.text.is_empty().then_some(LineKind::Blank)
}

fn group_name<'a>(line: Line<'a>, ctx: &ScanContext) -> Option<LineKind<'a>> {
    if !ctx.full() {
        return None;
    }
    let caps = PATTERNS.group.captures(line.text)?;
    Some(LineKind::GroupName(caps.get(1)?.as_str().trim()))
}

fn request_name<'a>(line: Line<'a>, ctx: &ScanContext) -> Option<LineKind<'a>> {
    if !ctx.full() {
        return None;
    }
    let caps = PATTERNS.name.captures(line.text)?;
    Some(LineKind::RequestName(caps.get(1)?.as_str()))
}

fn description<'a>(line: Line<'a>, ctx: &ScanContext) -> Option<LineKind<'a>> {
    if !ctx.full() {
        return None;
    }
    let caps = PATTERNS.description.captures(line.text)?;
    Some(LineKind::Description(caps.get(1)?.as_str()))
}

fn local_variable<'a>(line: Line<'a>, ctx: &ScanContext) -> Option<LineKind<'a>> {
    if !ctx.full() {
        return None;
    }
    let caps = PATTERNS.local_variable.captures(line.text)?;
    Some(LineKind::LocalVariable {
        name: caps.get(1)?.as_str(),
        value: caps.get(2)?.as_str().trim(),
    })
}

fn script_start<'a>(line: Line<'a>, ctx: &ScanContext) -> Option<LineKind<'a>> {
    if !ctx.full() || !line.text.starts_with('<') || !line.text.contains(SCRIPT_OPEN) {
        return None;
    }
    if line.text.contains(SCRIPT_CLOSE) {
        Some(LineKind::ScriptInline(line.text))
    } else {
        Some(LineKind::ScriptStart(line.text))
    }
}

fn script_end<'a>(line: Line<'a>, ctx: &ScanContext) -> Option<LineKind<'a>> {
    (ctx.state == BuilderState::InScriptBlock && line.text.contains(SCRIPT_CLOSE))
        .then_some(LineKind::ScriptEnd(line.text))
}

fn script_body<'a>(line: Line<'a>, ctx: &ScanContext) -> Option<LineKind<'a>> {
    (ctx.state == BuilderState::InScriptBlock).then_some(LineKind::ScriptBody(line.text))
}

fn separator<'a>(line: Line<'a>, ctx: &ScanContext) -> Option<LineKind<'a>> {
    let rest = line.text.strip_prefix(SEPARATOR)?;
    // `####` 之类的多余 `#` 不属于名称
    let name = rest.trim_start_matches('#').trim();
    if ctx.full() && !name.is_empty() {
        Some(LineKind::Separator(Some(name)))
    } else {
        Some(LineKind::Separator(None))
    }
}

fn comment<'a>(line: Line<'a>, ctx: &ScanContext) -> Option<LineKind<'a>> {
    // 精简语法没有描述注释，`//` 也当作普通注释
    let is_comment =
        line.text.starts_with('#') || (!ctx.full() && line.text.starts_with("//"));
    is_comment.then_some(LineKind::Comment)
}

fn request_line<'a>(line: Line<'a>, _: &ScanContext) -> Option<LineKind<'a>> {
    let caps = PATTERNS.request_line.captures(line.text)?;
    let method = caps.get(1)?.as_str().parse().ok()?;
    Some(LineKind::RequestLine {
        method,
        url: caps.get(2)?.as_str(),
    })
}

/// Body 模式优先于 `{` 和 `:` 的判断，JSON 中的 `"key": "value"` 不会被当成 Header
fn body_line<'a>(line: Line<'a>, ctx: &ScanContext) -> Option<LineKind<'a>> {
    (ctx.state == BuilderState::InJsonBody).then_some(LineKind::BodyLine(line.raw))
}

fn body_start<'a>(line: Line<'a>, _: &ScanContext) -> Option<LineKind<'a>> {
    line.text
        .starts_with('{')
        .then_some(LineKind::BodyStart(line.text))
}

fn header<'a>(line: Line<'a>, _: &ScanContext) -> Option<LineKind<'a>> {
    let (key, value) = line.text.split_once(':')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    Some(LineKind::Header {
        key,
        value: value.trim(),
    })
}
