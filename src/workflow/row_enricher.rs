//! 行增强流程 - 流程层
//!
//! 核心职责：定义"一行"在一个阶段内的完整处理流程
//!
//! 流程顺序：
//! 1. 构建提示词
//! 2. 调用生成服务
//! 3. 切分返回文本
//! 4. 调用失败时所有列填 `ERROR API`（兜底）

use tracing::{debug, info, warn};

use crate::clients::TextGenerator;
use crate::error::GenerationError;
use crate::models::{PassKind, Record};
use crate::prompts::build_prompt;
use crate::services::segmenter::{segment, SegmentedResult};
use crate::utils::logging::truncate_text;
use crate::workflow::row_ctx::RowCtx;

/// 单行处理结果
///
/// `result` 总是完整的；失败时 `error` 保留原因，供调用方写运行日志。
#[derive(Debug)]
pub struct RowOutcome {
    pub result: SegmentedResult,
    pub error: Option<GenerationError>,
}

impl RowOutcome {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// 行增强流程
///
/// - 编排一行的 构建 → 调用 → 切分
/// - 吸收生成错误，不向上传播
/// - 不持有表格，不负责限速
pub struct RowEnricher<'a> {
    generator: &'a dyn TextGenerator,
    pass: PassKind,
    verbose_logging: bool,
}

impl<'a> RowEnricher<'a> {
    /// 创建新的行增强流程
    pub fn new(generator: &'a dyn TextGenerator, pass: PassKind) -> Self {
        Self {
            generator,
            pass,
            verbose_logging: false,
        }
    }

    /// 打印提示词与返回文本的预览
    pub fn with_verbose_logging(mut self, verbose: bool) -> Self {
        self.verbose_logging = verbose;
        self
    }

    pub fn pass(&self) -> PassKind {
        self.pass
    }

    /// 处理一行
    ///
    /// # 参数
    /// - `record`: 当前行（只读）
    /// - `ctx`: 行上下文（仅用于日志）
    ///
    /// # 返回
    /// 本阶段所有派生列的取值
    pub async fn enrich(&self, record: &Record, ctx: &RowCtx) -> RowOutcome {
        let prompt = build_prompt(record, self.pass);

        if self.verbose_logging {
            debug!("{} 提示词: {}", ctx, truncate_text(&prompt, 120));
        }

        match self.generator.complete(&prompt).await {
            Ok(completion) => {
                if self.verbose_logging {
                    debug!("{} 返回文本: {}", ctx, truncate_text(&completion, 120));
                }
                let result = segment(self.pass, &completion);
                info!("{} ✓ 已生成 ({} 字符)", ctx, completion.chars().count());
                RowOutcome {
                    result,
                    error: None,
                }
            }
            Err(e) => {
                warn!("{} ⚠️ 生成失败，写入 ERROR API: {}", ctx, e);
                RowOutcome {
                    result: SegmentedResult::api_error(self.pass),
                    error: Some(e),
                }
            }
        }
    }
}
