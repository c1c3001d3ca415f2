use crate::parser::types::{ParsedUrl, PathVariable, QueryParam};
use crate::variable::VariableTable;
use crate::variable::resolver::variable_tokens;

/// 可以充当 host 的 baseUrl 变量写法
const BASE_URL_TOKENS: [&str; 2] = ["{{baseUrl}}", "{{baseURL}}"];

/// 输出时统一使用的 baseUrl 写法
const BASE_URL_HOST: &str = "{{baseUrl}}";

/// URL 拆解器
///
/// 路径变量的取值优先级：请求脚本变量 > 文件局部变量 > 空串。
pub struct UrlDecomposer<'a> {
    locals: &'a VariableTable,
    request_vars: &'a VariableTable,
}

impl<'a> UrlDecomposer<'a> {
    pub fn new(locals: &'a VariableTable, request_vars: &'a VariableTable) -> Self {
        Self {
            locals,
            request_vars,
        }
    }

    /// 拆解原始 URL 为 protocol / host / path / query / 路径变量
    pub fn decompose(&self, raw: &str) -> ParsedUrl {
        let mut url = ParsedUrl {
            raw: raw.to_string(),
            query: parse_query(raw),
            ..Default::default()
        };

        if BASE_URL_TOKENS.iter().any(|token| raw.contains(token)) {
            self.decompose_base_url(raw, &mut url);
        } else if let Some((protocol, rest)) = raw.split_once("://") {
            url.protocol = Some(protocol.to_string());

            let without_query = strip_query(rest);
            let mut parts = without_query.split('/');
            if let Some(host) = parts.next() {
                url.host = split_host(host);
            }
            url.path = parts.map(str::to_string).collect();
        } else {
            // 没有 scheme：只取第一段作为 host
            let without_query = strip_query(raw);
            let host = without_query.split('/').next().unwrap_or_default();
            url.host = split_host(host);
        }

        url
    }

    /// `{{baseUrl}}/users/{{id}}` 形式：host 固定为变量，路径中的变量改写为 `:name`
    fn decompose_base_url(&self, raw: &str, url: &mut ParsedUrl) {
        url.host = vec![BASE_URL_HOST.to_string()];

        let without_query = strip_query(raw);
        for segment in without_query.split('/').skip(1) {
            if segment.is_empty() {
                continue;
            }

            let tokens = variable_tokens(segment);
            if tokens.is_empty() {
                url.path.push(segment.to_string());
                continue;
            }

            let mut converted = segment.to_string();
            for (token, name) in tokens {
                converted = converted.replace(&token, &format!(":{}", name));
                url.variables.push(PathVariable {
                    value: self.path_variable_value(&name),
                    key: name,
                });
            }
            url.path.push(converted);
        }
    }

    fn path_variable_value(&self, name: &str) -> String {
        self.request_vars
            .get(name)
            .filter(|v| !v.is_empty())
            .or_else(|| self.locals.get(name))
            .unwrap_or_default()
            .to_string()
    }
}

/// 解析 query string：先按 `&` 拆分，再按第一个 `=` 拆分，没有 `=` 的参数被忽略
pub fn parse_query(raw: &str) -> Vec<QueryParam> {
    let Some(query) = raw.split('?').nth(1) else {
        return Vec::new();
    };

    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .map(|(key, value)| QueryParam {
            key: key.trim().to_string(),
            value: value.trim().to_string(),
        })
        .collect()
}

fn strip_query(s: &str) -> &str {
    s.split('?').next().unwrap_or(s)
}

fn split_host(host: &str) -> Vec<String> {
    host.split('.').map(str::to_string).collect()
}
