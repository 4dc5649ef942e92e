//! 批量处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责一次完整运行的资源和输出管理。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：校验配置、打印启动信息、创建生成客户端
//! 2. **表格增强**：委托 `EnrichmentDriver` 执行两个阶段
//! 3. **结果输出**：保存增强后的表格，再生成文档压缩包
//! 4. **全局统计**：汇总成功/失败调用数
//!
//! ## 设计特点
//!
//! - **顶层编排**：不处理单行的细节
//! - **资源所有者**：唯一持有生成客户端的模块
//! - **先存表后组装**：组装失败时增强结果已经落盘

use std::path::Path;

use tracing::{error, info, warn};

use crate::clients::{self, Credential, TextGenerator};
use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::{load_table, save_table, ItemTable};
use crate::orchestrator::assembler::{assemble, DocumentArchive};
use crate::orchestrator::enrichment_driver::{EnrichmentDriver, LogProgress};
use crate::services::PlaceholderTemplate;
use crate::utils::logging::{log_startup, print_final_stats};

/// 应用主结构
pub struct App {
    config: Config,
    generator: Box<dyn TextGenerator>,
}

impl App {
    /// 初始化应用
    ///
    /// 密钥或配置无效时在处理任何一行之前失败。
    pub fn initialize(config: Config, credential: &Credential) -> AppResult<Self> {
        config.validate()?;
        log_startup(&config);

        let generator = clients::configure(&config, credential)?;

        Ok(Self { config, generator })
    }

    /// 使用已创建的生成客户端
    pub fn with_generator(config: Config, generator: Box<dyn TextGenerator>) -> AppResult<Self> {
        config.validate()?;
        Ok(Self { config, generator })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// 运行应用主逻辑：增强 → 保存表格 → 组装文档
    ///
    /// # 参数
    /// - `input`: 输入表格
    /// - `template`: 文档模板，`None` 时跳过组装
    pub async fn run(&self, input: &Path, template: Option<&Path>) -> AppResult<()> {
        let enriched = self.enrich(input).await?;

        match template {
            Some(template) => {
                assemble_to_file(&enriched, template, &self.config).await?;
            }
            None => warn!("⚠️ 未提供模板，跳过文档生成"),
        }

        Ok(())
    }

    /// 增强表格并保存
    pub async fn enrich(&self, input: &Path) -> AppResult<ItemTable> {
        let reporter = LogProgress;
        let mut driver = EnrichmentDriver::from_config(self.generator.as_ref(), &reporter, &self.config);

        let (table, report) = driver.enrich_file(input).await.map_err(|e| {
            error!("❌ 表格增强失败: {}", e);
            e
        })?;

        info!("\n💾 正在保存增强后的表格: {}", self.config.output_table_path);
        save_table(&table, &self.config.output_table_path).await?;

        print_final_stats(
            report.success(),
            report.failed(),
            table.len(),
            &self.config.run_log_file,
        );

        Ok(table)
    }
}

/// 读取已增强的表格并生成文档压缩包（不需要密钥）
pub async fn assemble_file(input: &Path, template: &Path, config: &Config) -> AppResult<DocumentArchive> {
    info!("\n📁 正在载入表格: {}", input.display());
    let table = load_table(input).await?;
    assemble_to_file(&table, template, config).await
}

/// 组装文档并写入压缩包文件
async fn assemble_to_file(table: &ItemTable, template: &Path, config: &Config) -> AppResult<DocumentArchive> {
    info!("\n{}", "=".repeat(60));
    info!("📦 开始生成文档: 模板 {}", template.display());
    info!("{}", "=".repeat(60));

    let template = PlaceholderTemplate::from_file(template).await?;
    for name in template.placeholders() {
        if !table.has_column(name) {
            warn!("⚠️ 模板占位符 {{{{{}}}}} 在表格中没有对应的列，将渲染为空", name);
        }
    }
    let archive = assemble(table, &template, &config.id_column).map_err(|e| {
        error!("❌ 文档生成失败: {}", e);
        AppError::from(e)
    })?;

    tokio::fs::write(&config.archive_path, &archive.bytes)
        .await
        .map_err(|e| AppError::write_failed(&config.archive_path, e))?;

    info!("✓ 压缩包已保存至: {}", config.archive_path);
    Ok(archive)
}
