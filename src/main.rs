mod cli;

use clap::Parser;
use cli::Cli;
use colored::Colorize;
use std::process::ExitCode;

fn main() -> ExitCode {
    // 初始化日志系统
    http2postman::logger::init_logger();

    let cli = Cli::parse();
    match cli::run(&cli) {
        Ok(summary) => {
            println!(
                "{} {} to {} ({} requests, {} folders, {} variables)",
                "Successfully converted".green(),
                cli.input.display(),
                cli.output.display(),
                summary.requests,
                summary.groups,
                summary.variables
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}
