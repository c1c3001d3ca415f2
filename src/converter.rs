use crate::collection::{Collection, CollectionAssembler, write_collection};
use crate::config::ConverterOptions;
use crate::error::{ConvertError, Result};
use crate::parser::{BuilderOptions, RequestBuilder};
use crate::variable::{EnvironmentFile, EnvironmentLoader, detect_variables};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, info, warn};

/// 一次转换的统计信息
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConversionSummary {
    /// 输出的请求数（含文件夹中的请求）
    pub requests: usize,

    /// 输出的文件夹数
    pub groups: usize,

    /// collection 级变量数
    pub variables: usize,
}

impl ConversionSummary {
    fn of(collection: &Collection) -> Self {
        let groups = collection.item.iter().filter(|i| i.is_folder()).count();
        let requests = collection
            .item
            .iter()
            .map(|i| if i.is_folder() { i.item.len() } else { 1 })
            .sum();
        Self {
            requests,
            groups,
            variables: collection.variable.len(),
        }
    }
}

/// .http → Postman collection 转换器
///
/// 每次调用的状态都在调用内部创建和丢弃，同一个转换器可以在多个线程中并发使用。
#[derive(Debug, Clone, Default)]
pub struct Converter {
    options: ConverterOptions,
}

impl Converter {
    pub fn new(options: ConverterOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ConverterOptions {
        &self.options
    }

    /// 转换文件并写出结果
    pub fn convert_file<P, Q>(&self, input: P, output: Q) -> Result<ConversionSummary>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
    {
        let input = input.as_ref();
        let output = output.as_ref();

        let content = fs::read_to_string(input).map_err(|e| match e.kind() {
            ErrorKind::NotFound => ConvertError::InputNotFound {
                path: input.to_path_buf(),
            },
            _ => ConvertError::Io(e),
        })?;

        let collection = self.convert_with_environment(&content, input)?;
        write_collection(output, &collection)?;

        let summary = ConversionSummary::of(&collection);
        info!(
            input = %input.display(),
            output = %output.display(),
            requests = summary.requests,
            groups = summary.groups,
            variables = summary.variables,
            "Conversion finished"
        );
        Ok(summary)
    }

    /// 转换内容，环境文件按输入路径定位
    ///
    /// 文本中引用了变量时环境文件必须存在且合法，否则返回错误；
    /// 没有引用变量时，环境文件缺失或无效都会被忽略。
    pub fn convert_with_environment(&self, content: &str, input: &Path) -> Result<Collection> {
        let detected = detect_variables(content);
        let env_path = self.options.environment_path(input);

        let environments = match EnvironmentLoader::load_from_path(&env_path) {
            Ok(file) => Some(file),
            Err(e) if !detected.is_empty() => {
                let mut variables = Vec::new();
                for name in &detected {
                    if !variables.contains(name) {
                        variables.push(name.clone());
                    }
                }
                return Err(ConvertError::MissingEnvironment {
                    variables,
                    path: env_path,
                    reason: environment_failure_reason(&e),
                });
            }
            Err(e) => {
                debug!(
                    path = %env_path.display(),
                    error = %e,
                    "No usable environment file, none required"
                );
                None
            }
        };

        Ok(self.convert_content(content, &detected, environments.as_ref()))
    }

    /// 转换已读入的内容
    pub fn convert_content(
        &self,
        content: &str,
        detected: &[String],
        environments: Option<&EnvironmentFile>,
    ) -> Collection {
        let environment =
            environments.and_then(|file| file.get_environment(&self.options.environment));
        if environments.is_some() && environment.is_none() {
            warn!(
                environment = %self.options.environment,
                "Environment not found in environment file, variables resolve to empty values"
            );
        }

        let builder_options = BuilderOptions {
            dialect: self.options.dialect,
            substitute_header_variables: self.options.substitute_header_variables,
        };
        let parsed = RequestBuilder::new(builder_options)
            .with_environment(environment)
            .build(content);

        CollectionAssembler::new(&self.options.name_prefix).assemble(&parsed, detected, environment)
    }
}

/// 环境文件加载失败的原因，去掉外层错误的前缀
fn environment_failure_reason(err: &ConvertError) -> String {
    match err {
        ConvertError::Io(e) => e.to_string(),
        ConvertError::InvalidEnvironment { reason, .. } => reason.clone(),
        other => other.to_string(),
    }
}
