//! # Fichas Técnicas
//!
//! 用大模型为评测题目生成教学分析，并按模板输出每道题的技术卡片
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 基础设施层（Clients）
//! - `clients/` - 持有 HTTP 客户端和密钥，只暴露"提示词 → 文本"能力
//! - `GeminiClient` - Gemini `generateContent` 接口
//! - `OpenAiCompatClient` - 兼容 OpenAI 的 chat completions 接口
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单段文本或单份文档
//! - `segmenter` - 按标题切分模型输出
//! - `template_renderer` - 渲染文档模板
//! - `archive_writer` - 写 zip 压缩包
//! - `failure_log` - 写运行日志
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一行"的完整处理流程
//! - `RowCtx` - 上下文封装（阶段 + 行号）
//! - `RowEnricher` - 流程编排（prompt → complete → segment → 兜底）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 一次运行的入口，管理资源和输出
//! - `orchestrator/enrichment_driver` - 逐阶段遍历表格，控制并发和限速
//! - `orchestrator/assembler` - 表格 → 文档压缩包

pub mod cli;
pub mod clients;
pub mod config;
pub mod error;

pub mod models;
pub mod orchestrator;
pub mod prompts;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use clients::{Credential, TextGenerator};
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{ItemTable, PassKind, Record};
pub use orchestrator::{assemble, enrich, App, DocumentArchive};
pub use workflow::{RowCtx, RowEnricher};
