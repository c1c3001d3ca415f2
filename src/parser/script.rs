use once_cell::sync::Lazy;
use regex::Regex;

/// 请求脚本中唯一识别的调用：`request.variables.set("name", "value")`
static SET_VARIABLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"request\.variables\.set\("([^"]+)",\s*"([^"]+)"\)"#).unwrap()
});

/// 从一行脚本中提取所有变量设置调用，返回 (变量名, 值)
///
/// 其它脚本内容一律忽略，不做求值。
pub fn extract_variable_sets(line: &str) -> Vec<(&str, &str)> {
    SET_VARIABLE
        .captures_iter(line)
        .filter_map(|caps| Some((caps.get(1)?.as_str(), caps.get(2)?.as_str())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_line_script() {
        let line = r#"< {% request.variables.set("userId", "42") %}"#;
        assert_eq!(extract_variable_sets(line), vec![("userId", "42")]);
    }

    #[test]
    fn test_multiple_calls_on_one_line() {
        let line = r#"request.variables.set("a", "1"); request.variables.set("b","2");"#;
        assert_eq!(extract_variable_sets(line), vec![("a", "1"), ("b", "2")]);
    }

    #[test]
    fn test_ignores_other_code() {
        assert!(extract_variable_sets("client.global.set(\"token\", response.body.token);").is_empty());
        // 非字面量的值不识别
        assert!(extract_variable_sets("request.variables.set(\"id\", someVar)").is_empty());
    }
}
