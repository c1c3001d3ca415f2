//! Postman v2.1 collection 的输出模型
//!
//! 字段名与 Postman 的 JSON 结构一一对应，空的可选字段在序列化时省略。

use serde::Serialize;

/// Postman collection v2.1 schema
pub const SCHEMA_URL: &str = "https://schema.getpostman.com/json/collection/v2.1.0/collection.json";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Collection {
    pub info: Info,
    pub item: Vec<Item>,
    pub variable: Vec<Variable>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Info {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub schema: String,
}

/// 请求条目或文件夹条目（文件夹只有 `item`，没有 `request`）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Item {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub item: Vec<Item>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub request: Option<Request>,
}

impl Item {
    pub fn is_folder(&self) -> bool {
        self.request.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Request {
    pub method: String,
    pub header: Vec<Header>,
    pub body: Body,
    pub url: Url,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Header {
    pub key: String,
    pub value: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Body {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<BodyOptions>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BodyOptions {
    pub raw: RawOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawOptions {
    pub language: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Url {
    pub raw: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub host: Vec<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub path: Vec<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub query: Vec<QueryParam>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub variable: Vec<Variable>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryParam {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Variable {
    pub key: String,
    pub value: String,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl Variable {
    /// 字符串类型的变量
    pub fn string(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            kind: Some("string".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_folder_item_has_no_request() {
        let folder = Item {
            name: "USERS".to_string(),
            description: None,
            item: Vec::new(),
            request: None,
        };
        assert!(folder.is_folder());
        assert_eq!(serde_json::to_value(&folder).unwrap(), json!({"name": "USERS"}));
    }

    #[test]
    fn test_empty_body_and_url_fields_are_omitted() {
        let request = Request {
            method: "GET".to_string(),
            header: Vec::new(),
            body: Body::default(),
            url: Url {
                raw: "example.com".to_string(),
                host: vec!["example".to_string(), "com".to_string()],
                ..Default::default()
            },
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "method": "GET",
                "header": [],
                "body": {},
                "url": {"raw": "example.com", "host": ["example", "com"]}
            })
        );
    }

    #[test]
    fn test_type_field_names() {
        let header = Header {
            key: "Accept".to_string(),
            value: "*/*".to_string(),
            kind: "text".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&header).unwrap(),
            json!({"key": "Accept", "value": "*/*", "type": "text"})
        );
        assert_eq!(
            serde_json::to_value(Variable::string("id", "1")).unwrap(),
            json!({"key": "id", "value": "1", "type": "string"})
        );
    }
}
