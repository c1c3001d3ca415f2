use crate::parser::line::{BuilderState, Dialect, Line, LineKind, ScanContext, classify};
use crate::parser::script::extract_variable_sets;
use crate::parser::types::{
    Header, Method, ParsedFile, ParsedRequest, ParsedUrl, RequestBody, RequestGroup,
};
use crate::parser::url::UrlDecomposer;
use crate::variable::{Environment, VariableResolver, VariableTable};
use tracing::{debug, info, trace, warn};

/// 构建选项
#[derive(Debug, Clone, Copy, Default)]
pub struct BuilderOptions {
    pub dialect: Dialect,

    /// 是否用局部变量/环境变量替换 Header 值中的 `{{name}}`
    pub substitute_header_variables: bool,
}

/// JSON 括号深度，忽略字符串字面量内的括号
#[derive(Debug, Clone, Copy, Default)]
struct JsonDepth {
    depth: i32,
    in_string: bool,
    escaped: bool,
}

impl JsonDepth {
    fn feed(&mut self, text: &str) {
        for c in text.chars() {
            if self.in_string {
                match c {
                    _ if self.escaped => self.escaped = false,
                    '\\' => self.escaped = true,
                    '"' => self.in_string = false,
                    _ => {}
                }
                continue;
            }
            match c {
                '"' => self.in_string = true,
                '{' | '[' => self.depth += 1,
                '}' | ']' => self.depth -= 1,
                _ => {}
            }
        }
    }

    fn is_balanced(&self) -> bool {
        self.depth <= 0
    }
}

#[derive(Debug, Default)]
enum BodyDraft {
    #[default]
    Empty,
    Open {
        text: String,
        depth: JsonDepth,
    },
    Closed(String),
}

impl BodyDraft {
    fn is_open(&self) -> bool {
        matches!(self, BodyDraft::Open { .. })
    }

    /// 未闭合的 Body 以已累积的内容收尾
    fn close(&mut self) {
        if let BodyDraft::Open { text, .. } = self {
            *self = BodyDraft::Closed(text.trim().to_string());
        }
    }

    fn finish(mut self) -> Option<RequestBody> {
        self.close();
        match self {
            BodyDraft::Closed(raw) if !raw.is_empty() => Some(RequestBody::json(raw)),
            _ => None,
        }
    }
}

/// 当前请求的累积状态，封存或重置时整体替换
#[derive(Debug, Default)]
struct RequestDraft {
    method: Option<Method>,
    url: ParsedUrl,
    headers: Vec<Header>,
    body: BodyDraft,
    name: Option<String>,
    description: Option<String>,
    script_vars: VariableTable,
    line_number: usize,
}

impl RequestDraft {
    fn named(name: Option<&str>) -> Self {
        Self {
            name: name.map(str::to_string),
            ..Default::default()
        }
    }
}

/// 请求构建器：逐行分类并把结果折叠进当前请求/当前分组
pub struct RequestBuilder<'e> {
    options: BuilderOptions,
    environment: Option<&'e Environment>,
    state: BuilderState,
    current: RequestDraft,
    current_group: Option<RequestGroup>,
    file: ParsedFile,
    generated_names: usize,
}

impl<'e> RequestBuilder<'e> {
    pub fn new(options: BuilderOptions) -> Self {
        Self {
            options,
            environment: None,
            state: BuilderState::Idle,
            current: RequestDraft::default(),
            current_group: None,
            file: ParsedFile::new(),
            generated_names: 0,
        }
    }

    /// 设置当前环境（仅用于 Header 变量替换）
    pub fn with_environment(mut self, environment: Option<&'e Environment>) -> Self {
        self.environment = environment;
        self
    }

    /// 一次性处理全部内容
    pub fn build(mut self, content: &str) -> ParsedFile {
        for (index, raw) in content.lines().enumerate() {
            self.feed(Line::new(index + 1, raw));
        }
        self.finish()
    }

    /// 当前状态
    pub fn state(&self) -> BuilderState {
        self.state
    }

    /// 处理一行
    pub fn feed(&mut self, line: Line<'_>) {
        let ctx = ScanContext {
            dialect: self.options.dialect,
            state: self.state,
        };
        let kind = classify(line, &ctx);
        trace!(line = line.number, state = ?self.state, kind = ?kind, "Classified line");

        match kind {
            LineKind::Blank | LineKind::Comment => {}
            LineKind::GroupName(name) => self.open_group(name),
            LineKind::RequestName(name) => self.current.name = Some(name.to_string()),
            LineKind::Description(text) => self.current.description = Some(text.to_string()),
            LineKind::LocalVariable { name, value } => {
                debug!(name, value, "Local variable");
                self.file.local_variables.insert(name, value);
            }
            LineKind::ScriptInline(text) => self.record_script_vars(text),
            LineKind::ScriptStart(text) => {
                self.record_script_vars(text);
                self.state = BuilderState::InScriptBlock;
            }
            LineKind::ScriptEnd(text) => {
                self.record_script_vars(text);
                self.state = self.resting_state();
            }
            LineKind::ScriptBody(text) => self.record_script_vars(text),
            LineKind::Separator(next_name) => {
                self.seal();
                self.current = RequestDraft::named(next_name);
                self.state = BuilderState::Idle;
            }
            LineKind::RequestLine { method, url } => self.start_request(line.number, method, url),
            LineKind::BodyStart(text) => self.start_body(text),
            LineKind::BodyLine(raw) => self.append_body(raw),
            LineKind::Header { key, value } => self.push_header(key, value),
            LineKind::Unknown => {
                debug!(line = line.number, text = line.text, "Skipping unrecognized line");
            }
        }
    }

    /// 输入结束：封存最后一个请求并关闭当前分组
    pub fn finish(mut self) -> ParsedFile {
        self.seal();
        self.close_group();

        if self.file.grouped && !self.file.requests.is_empty() {
            warn!(
                count = self.file.requests.len(),
                "Requests declared before the first @group_name are not part of any group"
            );
        }

        self.file
    }

    /// 非脚本、非 Body 时应处的状态
    fn resting_state(&self) -> BuilderState {
        if self.current.body.is_open() {
            BuilderState::InJsonBody
        } else if self.current.method.is_some() {
            BuilderState::InHeaders
        } else {
            BuilderState::Idle
        }
    }

    fn open_group(&mut self, name: &str) {
        self.close_group();
        debug!(group = name, "Opening group");
        self.current_group = Some(RequestGroup::new(name));
        self.file.grouped = true;
    }

    fn close_group(&mut self) {
        if let Some(group) = self.current_group.take() {
            if group.is_empty() {
                debug!(group = %group.name, "Dropping empty group");
            } else {
                info!(group = %group.name, requests = group.requests.len(), "Group closed");
                self.file.groups.push(group);
            }
        }
    }

    fn record_script_vars(&mut self, text: &str) {
        for (name, value) in extract_variable_sets(text) {
            debug!(name, value, "Request variable");
            self.current.script_vars.insert(name, value);
        }
    }

    fn start_request(&mut self, line_number: usize, method: Method, raw_url: &str) {
        self.current.body.close();

        let url = UrlDecomposer::new(&self.file.local_variables, &self.current.script_vars)
            .decompose(raw_url);

        self.current.method = Some(method);
        self.current.url = url;
        self.current.line_number = line_number;
        self.state = BuilderState::InHeaders;
    }

    fn start_body(&mut self, text: &str) {
        if text.ends_with('}') {
            // 单行 JSON，只写入一次
            self.current.body = BodyDraft::Closed(text.to_string());
        } else {
            let mut depth = JsonDepth::default();
            depth.feed(text);
            self.current.body = BodyDraft::Open {
                text: text.to_string(),
                depth,
            };
        }
        self.state = self.resting_state();
    }

    fn append_body(&mut self, raw: &str) {
        let BodyDraft::Open { text, depth } = &mut self.current.body else {
            return;
        };

        depth.feed(raw);
        let closing = raw.trim_end().ends_with('}') && depth.is_balanced();

        // 中间行保留原始缩进，闭合行与首行一样去掉两端空白
        text.push('\n');
        text.push_str(if closing { raw.trim() } else { raw });

        if closing {
            self.current.body.close();
            self.state = self.resting_state();
        }
    }

    fn push_header(&mut self, key: &str, value: &str) {
        let value = if self.options.substitute_header_variables {
            VariableResolver::new(&self.file.local_variables, self.environment).substitute(value)
        } else {
            value.to_string()
        };
        self.current.headers.push(Header::new(key, value));
    }

    /// 当前请求有方法和 URL 时封存
    fn seal(&mut self) {
        let draft = std::mem::take(&mut self.current);
        let Some(method) = draft.method else {
            return;
        };
        if draft.url.raw.is_empty() {
            return;
        }

        let name = match draft.name {
            Some(name) => name,
            None => {
                self.generated_names += 1;
                format!("request-{}", self.generated_names)
            }
        };

        let request = ParsedRequest {
            name,
            description: draft.description,
            method,
            url: draft.url,
            headers: draft.headers,
            body: draft.body.finish(),
            line_number: draft.line_number,
        };
        info!(
            name = %request.name,
            method = %request.method,
            url = %request.url.raw,
            line = request.line_number,
            "Request sealed"
        );

        match self.current_group.as_mut() {
            Some(group) if self.file.grouped => group.requests.push(request),
            _ => self.file.requests.push(request),
        }
    }
}
