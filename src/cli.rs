use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use http2postman::{ConfigLoader, ConversionSummary, Converter, ConverterOptions};
use http2postman::parser::Dialect;

pub type Result<T> = std::result::Result<T, anyhow::Error>;

#[derive(Parser, Debug)]
#[command(author, version, about = "Convert .http request files into Postman collections", long_about = None)]
pub struct Cli {
    /// 输入的 .http 文件
    pub input: PathBuf,

    /// 输出的 Postman collection JSON 文件
    pub output: PathBuf,

    /// 使用的环境名称（默认 dev）
    #[arg(long = "env", value_name = "NAME")]
    pub environment: Option<String>,

    /// 环境文件路径（默认为输入文件旁边的 http-client.env.json）
    #[arg(long, value_name = "PATH")]
    pub env_file: Option<PathBuf>,

    /// collection 名称前缀（默认 jb-export-）
    #[arg(long, value_name = "PREFIX")]
    pub name_prefix: Option<String>,

    /// 使用精简语法：不识别分组、名称、局部变量和请求脚本
    #[arg(long)]
    pub legacy: bool,

    /// 替换 Header 值中的 {{variable}}
    #[arg(long)]
    pub substitute_headers: bool,

    /// 指定配置文件，不指定时自动查找 http2postman.toml
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// 默认值 < 配置文件 < 命令行参数
    pub fn options(&self) -> Result<ConverterOptions> {
        let config = match &self.config {
            Some(path) => Some(
                ConfigLoader::load_from_path(path)
                    .with_context(|| format!("加载配置文件失败 {}", path.display()))?,
            ),
            None => ConfigLoader::find_and_load(),
        };

        let mut options = ConverterOptions::default();
        if let Some(config) = &config {
            options = options.merge_config(config);
        }

        if let Some(environment) = &self.environment {
            options.environment = environment.clone();
        }
        if let Some(env_file) = &self.env_file {
            options.environment_file = Some(env_file.clone());
        }
        if let Some(prefix) = &self.name_prefix {
            options.name_prefix = prefix.clone();
        }
        if self.legacy {
            options.dialect = Dialect::Legacy;
        }
        if self.substitute_headers {
            options.substitute_header_variables = true;
        }

        Ok(options)
    }
}

pub fn run(cli: &Cli) -> Result<ConversionSummary> {
    let options = cli.options()?;
    tracing::debug!(?options, "Resolved options");

    let summary = Converter::new(options).convert_file(&cli.input, &cli.output)?;
    Ok(summary)
}
