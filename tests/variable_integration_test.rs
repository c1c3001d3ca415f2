use http2postman::parser::Dialect;
use http2postman::variable::{EnvironmentLoader, VariableResolver, VariableTable};
use http2postman::{ConfigLoader, ConvertError, Converter, ConverterOptions};
use std::fs;
use tempfile::TempDir;

/// 测试配置文件与环境文件协同工作
#[test]
fn test_config_file_selects_environment() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("http2postman.toml");
    fs::write(
        &config_path,
        r#"
environment = "staging"
environment_file = "envs/client.env.json"
name_prefix = "shop-"
"#,
    )
    .unwrap();

    fs::create_dir(temp_dir.path().join("envs")).unwrap();
    fs::write(
        temp_dir.path().join("envs/client.env.json"),
        r#"{"staging": {"baseUrl": "https://staging.example.com"}}"#,
    )
    .unwrap();

    let config = ConfigLoader::load_from_path(&config_path).unwrap();
    assert_eq!(
        config.environment_file.as_deref(),
        Some(temp_dir.path().join("envs/client.env.json").as_path())
    );

    let options = ConverterOptions::default().merge_config(&config);
    assert_eq!(options.environment, "staging");
    assert_eq!(options.dialect, Dialect::Full);

    let input = temp_dir.path().join("api.http");
    let output = temp_dir.path().join("api.json");
    fs::write(&input, "GET {{baseUrl}}/health\n").unwrap();

    Converter::new(options).convert_file(&input, &output).unwrap();

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    assert!(json["info"]["name"].as_str().unwrap().starts_with("shop-"));
    assert_eq!(json["variable"][0]["value"], "https://staging.example.com");
}

#[test]
fn test_unknown_config_key_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("http2postman.toml");
    fs::write(&config_path, "enviroment = \"dev\"\n").unwrap();

    let err = ConfigLoader::load_from_path(&config_path).unwrap_err();
    assert!(matches!(err, ConvertError::Config(_)));
}

/// 局部变量优先于环境变量
#[test]
fn test_local_variables_override_environment() {
    let temp_dir = TempDir::new().unwrap();
    let env_path = temp_dir.path().join("http-client.env.json");
    fs::write(
        &env_path,
        r#"{"dev": {"host": "env.example.com", "token": "env-token"}}"#,
    )
    .unwrap();

    let environments = EnvironmentLoader::load_from_path(&env_path).unwrap();
    let dev = environments.get_environment("dev");

    let mut locals = VariableTable::new();
    locals.insert("host", "local.example.com");

    let resolver = VariableResolver::new(&locals, dev);
    assert_eq!(
        resolver.substitute("https://{{host}}/?t={{token}}&x={{missing}}"),
        "https://local.example.com/?t=env-token&x={{missing}}"
    );
    assert_eq!(resolver.resolve_or_empty("missing"), "");
}

/// 未选中的环境不存在时仍然可以转换，变量值为空
#[test]
fn test_unknown_environment_yields_empty_values() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join("http-client.env.json"),
        r#"{"dev": {"baseUrl": "http://localhost"}}"#,
    )
    .unwrap();

    let input = temp_dir.path().join("api.http");
    let output = temp_dir.path().join("api.json");
    fs::write(&input, "GET {{baseUrl}}/health\n").unwrap();

    let options = ConverterOptions {
        environment: "qa".to_string(),
        ..Default::default()
    };
    Converter::new(options).convert_file(&input, &output).unwrap();

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(
        json["variable"],
        serde_json::json!([{"key": "baseUrl", "value": "", "type": "string"}])
    );
}
