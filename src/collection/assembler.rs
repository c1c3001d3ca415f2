use crate::collection::model::{
    Body, BodyOptions, Collection, Header, Info, Item, QueryParam, RawOptions, Request,
    SCHEMA_URL, Url, Variable,
};
use crate::parser::{ParsedFile, ParsedRequest};
use crate::variable::{Environment, VariableResolver};
use chrono::{DateTime, Local};
use std::collections::HashSet;
use tracing::debug;

/// Header 的固定类型
const HEADER_TYPE: &str = "text";

/// 将解析结果组装为 Postman collection
#[derive(Debug, Clone)]
pub struct CollectionAssembler {
    name_prefix: String,
}

impl CollectionAssembler {
    pub const DEFAULT_NAME_PREFIX: &'static str = "jb-export-";

    pub fn new(name_prefix: impl Into<String>) -> Self {
        Self {
            name_prefix: name_prefix.into(),
        }
    }

    /// 组装 collection，名称使用当前时间
    pub fn assemble(
        &self,
        file: &ParsedFile,
        detected: &[String],
        environment: Option<&Environment>,
    ) -> Collection {
        self.assemble_at(file, detected, environment, Local::now())
    }

    /// 组装 collection，名称使用指定时间
    pub fn assemble_at(
        &self,
        file: &ParsedFile,
        detected: &[String],
        environment: Option<&Environment>,
        now: DateTime<Local>,
    ) -> Collection {
        let resolver = VariableResolver::new(&file.local_variables, environment);

        Collection {
            info: Info {
                name: format!("{}{}", self.name_prefix, now.format("%Y%m%d%H%M%S")),
                description: None,
                schema: SCHEMA_URL.to_string(),
            },
            item: collection_items(file),
            variable: collection_variables(file, detected, &resolver),
        }
    }
}

impl Default for CollectionAssembler {
    fn default() -> Self {
        Self::new(Self::DEFAULT_NAME_PREFIX)
    }
}

/// 构建 collection 级变量列表
///
/// 1. 文本中引用的变量按首次出现顺序去重，值取局部变量 > 环境变量 > 空串
/// 2. 没有被引用的局部变量追加在末尾
pub fn collection_variables(
    file: &ParsedFile,
    detected: &[String],
    resolver: &VariableResolver<'_>,
) -> Vec<Variable> {
    let mut seen = HashSet::new();
    let mut variables = Vec::new();

    for name in detected {
        if seen.insert(name.as_str()) {
            variables.push(Variable::string(name, resolver.resolve_or_empty(name)));
        }
    }

    for (name, value) in file.local_variables.iter() {
        if seen.insert(name) {
            variables.push(Variable::string(name, value));
        }
    }

    variables
}

/// 构建条目列表
///
/// 使用了分组且至少一个分组中有有效请求时输出文件夹，否则输出扁平列表。
pub fn collection_items(file: &ParsedFile) -> Vec<Item> {
    let has_grouped_requests = file
        .groups
        .iter()
        .any(|group| group.requests.iter().any(ParsedRequest::is_complete));

    if file.grouped && has_grouped_requests {
        file.groups
            .iter()
            .filter_map(|group| {
                let items = valid_items(&group.requests);
                if items.is_empty() {
                    debug!(group = %group.name, "Skipping group without valid requests");
                    return None;
                }
                Some(Item {
                    name: group.name.clone(),
                    description: None,
                    item: items,
                    request: None,
                })
            })
            .collect()
    } else {
        valid_items(&file.requests)
    }
}

fn valid_items(requests: &[ParsedRequest]) -> Vec<Item> {
    requests
        .iter()
        .filter(|request| request.is_complete())
        .map(request_item)
        .collect()
}

/// 单个请求转换为 Postman 条目
pub fn request_item(request: &ParsedRequest) -> Item {
    let body = match &request.body {
        Some(body) => Body {
            mode: Some("raw".to_string()),
            raw: Some(body.raw.clone()),
            options: Some(BodyOptions {
                raw: RawOptions {
                    language: body.language.clone(),
                },
            }),
        },
        None => Body::default(),
    };

    let url = &request.url;
    Item {
        name: request.name.clone(),
        description: request.description.clone(),
        item: Vec::new(),
        request: Some(Request {
            method: request.method.to_string(),
            header: request
                .headers
                .iter()
                .map(|h| Header {
                    key: h.key.clone(),
                    value: h.value.clone(),
                    kind: HEADER_TYPE.to_string(),
                })
                .collect(),
            body,
            url: Url {
                raw: url.raw.clone(),
                protocol: url.protocol.clone(),
                host: url.host.clone(),
                path: url.path.clone(),
                query: url
                    .query
                    .iter()
                    .map(|q| QueryParam {
                        key: q.key.clone(),
                        value: q.value.clone(),
                    })
                    .collect(),
                variable: url
                    .variables
                    .iter()
                    .map(|v| Variable::string(&v.key, &v.value))
                    .collect(),
            },
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{Method, ParsedUrl, RequestGroup, parse_content};
    use chrono::TimeZone;
    use std::collections::HashMap;

    fn request(name: &str, raw_url: &str) -> ParsedRequest {
        ParsedRequest {
            name: name.to_string(),
            description: None,
            method: Method::Get,
            url: ParsedUrl {
                raw: raw_url.to_string(),
                ..Default::default()
            },
            headers: Vec::new(),
            body: None,
            line_number: 1,
        }
    }

    fn detected(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_collection_name_and_schema() {
        let now = Local.with_ymd_and_hms(2024, 3, 5, 7, 8, 9).unwrap();
        let collection =
            CollectionAssembler::default().assemble_at(&ParsedFile::new(), &[], None, now);
        assert_eq!(collection.info.name, "jb-export-20240305070809");
        assert_eq!(collection.info.schema, SCHEMA_URL);
        assert!(collection.item.is_empty());
        assert!(collection.variable.is_empty());
    }

    #[test]
    fn test_custom_name_prefix() {
        let now = Local.with_ymd_and_hms(2024, 12, 31, 23, 59, 0).unwrap();
        let collection =
            CollectionAssembler::new("api-").assemble_at(&ParsedFile::new(), &[], None, now);
        assert_eq!(collection.info.name, "api-20241231235900");
    }

    #[test]
    fn test_variables_priority_and_dedup() {
        let file = parse_content("@token = local\n@unused = x\nGET {{baseUrl}}/a");
        let environment = Environment {
            variables: HashMap::from([
                ("baseUrl".to_string(), "https://env.example.com".to_string()),
                ("token".to_string(), "env".to_string()),
            ]),
        };
        let resolver = VariableResolver::new(&file.local_variables, Some(&environment));

        let variables = collection_variables(
            &file,
            &detected(&["baseUrl", "token", "baseUrl", "missing"]),
            &resolver,
        );
        let pairs: Vec<_> = variables
            .iter()
            .map(|v| (v.key.as_str(), v.value.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("baseUrl", "https://env.example.com"),
                ("token", "local"),
                ("missing", ""),
                ("unused", "x"),
            ]
        );
        assert!(variables.iter().all(|v| v.kind.as_deref() == Some("string")));
    }

    #[test]
    fn test_flat_items_filter_incomplete_requests() {
        let mut file = ParsedFile::new();
        file.requests.push(request("a", "https://example.com/a"));
        file.requests.push(request("broken", ""));
        file.requests.push(request("b", "https://example.com/b"));

        let items = collection_items(&file);
        let names: Vec<_> = items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert!(items.iter().all(|i| !i.is_folder()));
    }

    #[test]
    fn test_grouped_items_become_folders() {
        let mut file = ParsedFile::new();
        file.grouped = true;
        file.requests.push(request("ungrouped", "https://example.com/u"));

        let mut users = RequestGroup::new("USERS");
        users.requests.push(request("list", "https://example.com/users"));
        users.requests.push(request("get", "https://example.com/users/1"));
        let mut broken = RequestGroup::new("BROKEN");
        broken.requests.push(request("broken", ""));
        file.groups.push(users);
        file.groups.push(broken);

        let items = collection_items(&file);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "USERS");
        assert!(items[0].is_folder());
        assert_eq!(items[0].item.len(), 2);
    }

    #[test]
    fn test_grouping_without_grouped_requests_falls_back_to_flat() {
        let mut file = ParsedFile::new();
        file.grouped = true;
        file.requests.push(request("a", "https://example.com/a"));

        let items = collection_items(&file);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "a");
    }

    #[test]
    fn test_request_item_body_and_url() {
        let file = parse_content(
            "POST https://api.example.com/users?page=1\nContent-Type: application/json\n\n{\"name\": \"John\"}",
        );
        let item = request_item(&file.requests[0]);
        let request = item.request.unwrap();

        assert_eq!(request.method, "POST");
        assert_eq!(request.header[0].kind, "text");
        assert_eq!(request.body.mode.as_deref(), Some("raw"));
        assert_eq!(request.body.raw.as_deref(), Some(r#"{"name": "John"}"#));
        assert_eq!(request.body.options.unwrap().raw.language, "json");
        assert_eq!(request.url.protocol.as_deref(), Some("https"));
        assert_eq!(request.url.path, vec!["users"]);
        assert_eq!(request.url.query[0].value, "1");
    }
}
