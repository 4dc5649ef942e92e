use anyhow::{Context, Result};

use fichas_tecnicas::cli::{Cli, Commands};
use fichas_tecnicas::orchestrator::assemble_file;
use fichas_tecnicas::utils::logging;
use fichas_tecnicas::{App, Config, Credential};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    // 初始化日志
    logging::init(cli.verbose);

    // 加载配置：文件 → 环境变量 → 命令行
    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    let config = cli.apply_to(config.apply_env()?);

    match &cli.command {
        Commands::Run { io, template, .. } => {
            let credential = Credential::resolve(cli.api_key.as_deref())?;
            App::initialize(config, &credential)?
                .run(&io.input, template.as_deref())
                .await?;
        }
        Commands::Enrich { io } => {
            let credential = Credential::resolve(cli.api_key.as_deref())?;
            App::initialize(config, &credential)?.enrich(&io.input).await?;
        }
        Commands::Assemble {
            input, template, ..
        } => {
            config.validate()?;
            assemble_file(input, template, &config)
                .await
                .with_context(|| format!("无法为 {} 生成文档", input.display()))?;
        }
    }

    Ok(())
}
