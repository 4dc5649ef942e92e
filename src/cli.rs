//! 命令行参数

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{Config, Provider};

#[derive(Parser, Debug)]
#[command(name = "fichas")]
#[command(version, about = "Genera fichas técnicas de ítems de evaluación con IA", long_about = None)]
pub struct Cli {
    /// 配置文件路径（TOML）
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// API 密钥（也可通过 GEMINI_API_KEY / LLM_API_KEY 提供）
    #[arg(long, value_name = "KEY", global = true)]
    pub api_key: Option<String>,

    /// 生成服务提供方 (gemini, openai)
    #[arg(short = 'p', long, global = true)]
    pub provider: Option<Provider>,

    /// 模型名称
    #[arg(short = 'm', long, global = true)]
    pub model: Option<String>,

    /// 同时处理的行数
    #[arg(long, value_name = "N", global = true)]
    pub concurrency: Option<usize>,

    /// 两次调用之间的间隔（毫秒）
    #[arg(long, value_name = "MS", global = true)]
    pub delay_ms: Option<u64>,

    /// 显示详细日志
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// 增强表格并生成文档压缩包
    Run {
        #[command(flatten)]
        io: EnrichArgs,

        /// 文档模板；不提供时只输出增强后的表格
        #[arg(short, long, value_name = "FILE")]
        template: Option<PathBuf>,

        #[command(flatten)]
        archive: ArchiveArgs,
    },

    /// 只增强表格
    Enrich {
        #[command(flatten)]
        io: EnrichArgs,
    },

    /// 用已增强的表格生成文档压缩包（不调用生成服务）
    Assemble {
        /// 已增强的表格
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,

        /// 文档模板
        #[arg(short, long, value_name = "FILE")]
        template: PathBuf,

        #[command(flatten)]
        archive: ArchiveArgs,
    },
}

#[derive(Args, Debug)]
pub struct EnrichArgs {
    /// 输入表格 (.json / .toml)
    #[arg(short, long, value_name = "FILE")]
    pub input: PathBuf,

    /// 增强后表格的输出路径
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<String>,
}

#[derive(Args, Debug)]
pub struct ArchiveArgs {
    /// 压缩包输出路径
    #[arg(short, long, value_name = "FILE")]
    pub archive: Option<String>,

    /// 用于命名文档的列
    #[arg(long, value_name = "COLUMN")]
    pub id_column: Option<String>,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// 用命令行参数覆盖配置
    pub fn apply_to(&self, mut config: Config) -> Config {
        if let Some(provider) = self.provider {
            config.provider = provider;
        }
        if let Some(model) = &self.model {
            config.model_name = model.clone();
        }
        if let Some(n) = self.concurrency {
            config.max_concurrent_rows = n;
        }
        if let Some(ms) = self.delay_ms {
            config.request_delay_ms = ms;
        }
        if self.verbose {
            config.verbose_logging = true;
        }

        let (output, archive) = match &self.command {
            Commands::Run { io, archive, .. } => (io.output.as_ref(), Some(archive)),
            Commands::Enrich { io } => (io.output.as_ref(), None),
            Commands::Assemble { archive, .. } => (None, Some(archive)),
        };
        if let Some(output) = output {
            config.output_table_path = output.clone();
        }
        if let Some(archive) = archive {
            if let Some(path) = &archive.archive {
                config.archive_path = path.clone();
            }
            if let Some(column) = &archive.id_column {
                config.id_column = column.clone();
            }
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_overrides_config() {
        let cli = Cli::parse_from([
            "fichas",
            "run",
            "--input",
            "items.json",
            "--template",
            "ficha.md",
            "--id-column",
            "Codigo",
            "--concurrency",
            "2",
        ]);
        let config = cli.apply_to(Config::default());

        assert_eq!(config.id_column, "Codigo");
        assert_eq!(config.max_concurrent_rows, 2);
        assert_eq!(config.archive_path, "fichas_tecnicas_generadas.zip");
        assert!(matches!(cli.command, Commands::Run { template: Some(_), .. }));
    }

    #[test]
    fn test_assemble_requires_template() {
        assert!(Cli::try_parse_from(["fichas", "assemble", "--input", "out.json"]).is_err());
    }

    #[test]
    fn test_provider_flag_parses() {
        let cli = Cli::parse_from(["fichas", "enrich", "-i", "items.toml", "-p", "openai"]);
        assert_eq!(cli.apply_to(Config::default()).provider, Provider::Openai);
    }
}
