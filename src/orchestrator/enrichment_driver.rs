//! 表格增强驱动 - 编排层
//!
//! ## 职责
//!
//! 按阶段逐行驱动 `RowEnricher`，把切分结果作为新列追加到表格。
//!
//! ## 核心功能
//!
//! 1. **阶段顺序**：分析阶段的列全部追加后才开始建议阶段
//! 2. **限速**：每次调用结束后固定等待 `request_delay`
//! 3. **并发控制**：`buffer_unordered` 限制同时进行的调用数，结果按行号写回
//! 4. **错误吸收**：单行失败只记日志，不中断整批
//! 5. **进度上报**：每行完成后上报 已完成/总数
//!
//! ## 状态
//!
//! `Idle → LoadingTable → AnalysisPass → RecommendationPass → Done`，
//! 派生列已存在或追加失败时进入 `Failed`。

use std::path::Path;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use tracing::{error, info, warn};

use crate::clients::{self, Credential, TextGenerator};
use crate::config::Config;
use crate::error::{AppResult, TableError};
use crate::models::{load_table, ItemTable, PassKind};
use crate::services::{FailureLog, SegmentedResult};
use crate::workflow::{RowCtx, RowEnricher};

/// 运行状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    LoadingTable,
    AnalysisPass,
    RecommendationPass,
    Done,
    Failed,
}

impl RunState {
    fn for_pass(pass: PassKind) -> Self {
        match pass {
            PassKind::Analysis => RunState::AnalysisPass,
            PassKind::Recommendation => RunState::RecommendationPass,
        }
    }
}

/// 进度
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressUpdate {
    pub pass: PassKind,
    pub completed: usize,
    pub total: usize,
}

impl ProgressUpdate {
    /// 完成比例，空表视为已完成
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.completed as f64 / self.total as f64
        }
    }
}

/// 进度接收方
pub trait ProgressReporter: Send + Sync {
    fn report(&self, update: ProgressUpdate);
}

/// 把进度写到日志
#[derive(Debug, Default)]
pub struct LogProgress;

impl ProgressReporter for LogProgress {
    fn report(&self, update: ProgressUpdate) {
        info!(
            "📊 [{}] 进度 {}/{} ({:.0}%)",
            update.pass,
            update.completed,
            update.total,
            update.fraction() * 100.0
        );
    }
}

/// 单个阶段的统计
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassStats {
    pub pass: PassKind,
    pub success: usize,
    pub failed: usize,
}

/// 整次增强的统计
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnrichmentReport {
    pub passes: Vec<PassStats>,
}

impl EnrichmentReport {
    pub fn success(&self) -> usize {
        self.passes.iter().map(|p| p.success).sum()
    }

    pub fn failed(&self) -> usize {
        self.passes.iter().map(|p| p.failed).sum()
    }

    pub fn calls(&self) -> usize {
        self.success() + self.failed()
    }
}

/// 表格增强驱动
///
/// 运行期间独占表格。
pub struct EnrichmentDriver<'a> {
    generator: &'a dyn TextGenerator,
    request_delay: Duration,
    max_concurrent: usize,
    verbose_logging: bool,
    failure_log: Option<FailureLog>,
    reporter: &'a dyn ProgressReporter,
    state: RunState,
}

impl<'a> EnrichmentDriver<'a> {
    /// 创建驱动
    ///
    /// # 参数
    /// - `generator`: 已配置好的生成客户端
    /// - `reporter`: 进度接收方
    pub fn new(generator: &'a dyn TextGenerator, reporter: &'a dyn ProgressReporter) -> Self {
        Self {
            generator,
            request_delay: Duration::from_millis(1000),
            max_concurrent: 1,
            verbose_logging: false,
            failure_log: None,
            reporter,
            state: RunState::Idle,
        }
    }

    /// 按配置设置限速、并发和日志
    pub fn from_config(
        generator: &'a dyn TextGenerator,
        reporter: &'a dyn ProgressReporter,
        config: &Config,
    ) -> Self {
        Self::new(generator, reporter)
            .with_request_delay(Duration::from_millis(config.request_delay_ms))
            .with_max_concurrent(config.max_concurrent_rows)
            .with_verbose_logging(config.verbose_logging)
            .with_failure_log(FailureLog::with_path(&config.run_log_file))
    }

    pub fn with_request_delay(mut self, delay: Duration) -> Self {
        self.request_delay = delay;
        self
    }

    /// 同时进行的调用数，最小为 1
    pub fn with_max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = max_concurrent.max(1);
        self
    }

    pub fn with_verbose_logging(mut self, verbose: bool) -> Self {
        self.verbose_logging = verbose;
        self
    }

    pub fn with_failure_log(mut self, log: FailureLog) -> Self {
        self.failure_log = Some(log);
        self
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// 载入表格并执行全部阶段
    pub async fn enrich_file(&mut self, path: impl AsRef<Path>) -> AppResult<(ItemTable, EnrichmentReport)> {
        let path = path.as_ref();
        self.state = RunState::LoadingTable;
        info!("\n📁 正在载入表格: {}", path.display());

        let table = match load_table(path).await {
            Ok(table) => table,
            Err(e) => {
                self.state = RunState::Failed;
                return Err(e.into());
            }
        };
        info!("✓ 载入 {} 行, {} 列", table.len(), table.columns().len());

        if let Some(log) = &self.failure_log {
            if let Err(e) = log.init(&path.display().to_string(), table.len()).await {
                warn!("⚠️ 无法写入运行日志: {}", e);
            }
        }

        self.enrich(table).await
    }

    /// 依次执行分析阶段和建议阶段
    ///
    /// # 返回
    /// 追加了全部派生列的表格，以及每个阶段的成功/失败数
    pub async fn enrich(&mut self, mut table: ItemTable) -> AppResult<(ItemTable, EnrichmentReport)> {
        for pass in PassKind::ALL {
            if let Err(e) = ensure_columns_free(&table, pass) {
                self.state = RunState::Failed;
                error!("❌ {}", e);
                return Err(e.into());
            }
        }

        let mut report = EnrichmentReport::default();
        for pass in PassKind::ALL {
            let stats = self.run_pass(&mut table, pass).await?;
            report.passes.push(stats);
        }

        self.state = RunState::Done;
        Ok((table, report))
    }

    /// 执行一个阶段并追加该阶段的列
    pub async fn run_pass(&mut self, table: &mut ItemTable, pass: PassKind) -> AppResult<PassStats> {
        self.state = RunState::for_pass(pass);

        if let Err(e) = ensure_columns_free(table, pass) {
            self.state = RunState::Failed;
            return Err(e.into());
        }

        let (results, stats) = self.collect_pass(table, pass).await;

        let mut columns: Vec<Vec<String>> = pass
            .columns()
            .iter()
            .map(|_| Vec::with_capacity(results.len()))
            .collect();
        for result in results {
            for (column, value) in columns.iter_mut().zip(result.into_values()) {
                column.push(value);
            }
        }

        for (name, values) in pass.columns().iter().zip(columns) {
            if let Err(e) = table.append_column(name, values) {
                self.state = RunState::Failed;
                error!("❌ 追加列 {} 失败: {}", name, e);
                return Err(e.into());
            }
        }

        log_pass_complete(&stats, table.len());
        Ok(stats)
    }

    /// 并发处理所有行，结果按行号排列
    async fn collect_pass(&self, table: &ItemTable, pass: PassKind) -> (Vec<SegmentedResult>, PassStats) {
        let total = table.len();
        log_pass_start(pass, total, self.max_concurrent);

        let mut stats = PassStats {
            pass,
            success: 0,
            failed: 0,
        };

        if total == 0 {
            self.reporter.report(ProgressUpdate {
                pass,
                completed: 0,
                total,
            });
            return (Vec::new(), stats);
        }

        let enricher = RowEnricher::new(self.generator, pass).with_verbose_logging(self.verbose_logging);
        let enricher = &enricher;
        let delay = self.request_delay;

        let mut slots: Vec<Option<SegmentedResult>> = vec![None; total];
        let mut rows = stream::iter(table.records().iter().enumerate())
            .map(|(index, record)| async move {
                let ctx = RowCtx::new(pass, index, total);
                let outcome = enricher.enrich(record, &ctx).await;
                tokio::time::sleep(delay).await;
                (ctx, outcome)
            })
            .buffer_unordered(self.max_concurrent);

        let mut completed = 0;
        while let Some((ctx, outcome)) = rows.next().await {
            match &outcome.error {
                None => stats.success += 1,
                Some(e) => {
                    stats.failed += 1;
                    self.record_failure(&ctx, &e.to_string()).await;
                }
            }
            slots[ctx.index()] = Some(outcome.result);

            completed += 1;
            self.reporter.report(ProgressUpdate {
                pass,
                completed,
                total,
            });
        }

        let results = slots
            .into_iter()
            .map(|slot| slot.unwrap_or_else(|| SegmentedResult::api_error(pass)))
            .collect();
        (results, stats)
    }

    async fn record_failure(&self, ctx: &RowCtx, reason: &str) {
        if let Some(log) = &self.failure_log {
            if let Err(e) = log.record(ctx.pass, ctx.row, reason).await {
                warn!("{} ⚠️ 无法写入运行日志: {}", ctx, e);
            }
        }
    }
}

/// 用给定密钥和配置增强一张表格
///
/// 不写运行日志，进度输出到日志。
///
/// # 返回
/// 追加了五个派生列的表格；密钥无效时在发送任何提示词之前失败
pub async fn enrich(table: ItemTable, credential: &Credential, config: &Config) -> AppResult<ItemTable> {
    config.validate()?;
    let generator = clients::configure(config, credential)?;
    let reporter = LogProgress;

    let mut driver = EnrichmentDriver::new(generator.as_ref(), &reporter)
        .with_request_delay(Duration::from_millis(config.request_delay_ms))
        .with_max_concurrent(config.max_concurrent_rows)
        .with_verbose_logging(config.verbose_logging);

    let (table, _) = driver.enrich(table).await?;
    Ok(table)
}

/// 本阶段的派生列不能已经存在
fn ensure_columns_free(table: &ItemTable, pass: PassKind) -> Result<(), TableError> {
    match pass.columns().iter().find(|c| table.has_column(c)) {
        Some(column) => Err(TableError::ColumnExists {
            column: column.to_string(),
        }),
        None => Ok(()),
    }
}

// ========== 日志辅助函数 ==========

fn log_pass_start(pass: PassKind, total: usize, max_concurrent: usize) {
    info!("\n{}", "=".repeat(60));
    info!("📦 开始{}阶段: 共 {} 行", pass, total);
    info!("📋 同时处理 {} 行", max_concurrent);
    info!("{}", "=".repeat(60));
}

fn log_pass_complete(stats: &PassStats, total: usize) {
    info!("\n{}", "─".repeat(60));
    info!("✓ {}阶段完成: 成功 {}/{}", stats.pass, stats.success, total);
    if stats.failed > 0 {
        warn!("⚠️ {} 行生成失败，已填入 ERROR API", stats.failed);
    }
    info!("{}", "─".repeat(60));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AppError, GenerationError, ProviderFault};
    use crate::models::pass::*;
    use crate::models::Record;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    const ANALYSIS_REPLY: &str = "Qué Evalúa:\nSuma.\nRuta Cognitiva Correcta:\nSuma dos y dos.\nAnálisis de Opciones No Válidas:\nA resta.";
    const RECOMMENDATION_REPLY: &str =
        "RECOMENDACIÓN PARA FORTALECER\nContar fichas.\nRECOMENDACIÓN PARA AVANZAR\nFracciones.";

    /// 按提示词内容返回固定文本，可指定失败的题目
    struct FakeGenerator {
        fail_marker: Option<&'static str>,
        prompts: Mutex<Vec<String>>,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
    }

    impl FakeGenerator {
        fn new(fail_marker: Option<&'static str>) -> Self {
            Self {
                fail_marker,
                prompts: Mutex::new(Vec::new()),
                in_flight: AtomicUsize::new(0),
                max_in_flight: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl TextGenerator for FakeGenerator {
        async fn complete(&self, prompt: &str) -> Result<String, GenerationError> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(10)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            self.prompts.lock().unwrap().push(prompt.to_string());
            if self.fail_marker.is_some_and(|m| prompt.contains(m)) {
                return Err(GenerationError::new(
                    "fake",
                    ProviderFault::BadStatus {
                        status: 500,
                        body: "internal".to_string(),
                    },
                ));
            }
            if prompt.contains("RECOMENDACIÓN") || prompt.contains("Recomendación") {
                Ok(RECOMMENDATION_REPLY.to_string())
            } else {
                Ok(ANALYSIS_REPLY.to_string())
            }
        }

        fn model_name(&self) -> &str {
            "fake"
        }
    }

    #[derive(Default)]
    struct Recorder(Mutex<Vec<ProgressUpdate>>);

    impl ProgressReporter for Recorder {
        fn report(&self, update: ProgressUpdate) {
            self.0.lock().unwrap().push(update);
        }
    }

    fn table(rows: usize) -> ItemTable {
        let records = (1..=rows)
            .map(|i| {
                serde_json::from_value::<Record>(json!({
                    "ItemId": format!("MAT-{:02}", i),
                    "Pregunta": format!("Pregunta número {}", i),
                }))
                .unwrap()
            })
            .collect();
        ItemTable::new(records)
    }

    #[tokio::test(start_paused = true)]
    async fn test_failing_row_keeps_order_and_count() {
        let generator = FakeGenerator::new(Some("Pregunta número 3"));
        let recorder = Recorder::default();
        let mut driver = EnrichmentDriver::new(&generator, &recorder);

        let (enriched, report) = driver.enrich(table(5)).await.unwrap();

        assert_eq!(driver.state(), RunState::Done);
        assert_eq!(enriched.len(), 5);
        for (i, record) in enriched.records().iter().enumerate() {
            assert_eq!(record.text("ItemId").unwrap(), format!("MAT-{:02}", i + 1));
        }

        let row3 = &enriched.records()[2];
        for column in PassKind::Analysis.columns().iter().chain(PassKind::Recommendation.columns()) {
            assert_eq!(row3.text(column).as_deref(), Some(API_ERROR_SENTINEL));
        }
        let row4 = &enriched.records()[3];
        assert_eq!(row4.text(QUE_EVALUA).as_deref(), Some("Suma."));
        assert_eq!(row4.text(RECOMENDACION_AVANZAR).as_deref(), Some("RECOMENDACIÓN PARA AVANZAR\nFracciones."));

        assert_eq!(report.failed(), 2);
        assert_eq!(report.success(), 8);
        assert_eq!(report.calls(), 10);
    }

    #[tokio::test(start_paused = true)]
    async fn test_progress_is_monotonic_and_ends_at_one() {
        let generator = FakeGenerator::new(None);
        let recorder = Recorder::default();
        let mut driver = EnrichmentDriver::new(&generator, &recorder);

        driver.enrich(table(4)).await.unwrap();

        let updates = recorder.0.lock().unwrap();
        for pass in PassKind::ALL {
            let fractions: Vec<f64> = updates
                .iter()
                .filter(|u| u.pass == pass)
                .map(ProgressUpdate::fraction)
                .collect();
            assert_eq!(fractions.len(), 4);
            assert!(fractions.windows(2).all(|w| w[0] < w[1]));
            assert_eq!(fractions.last().copied(), Some(1.0));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_table_reports_complete() {
        let generator = FakeGenerator::new(None);
        let recorder = Recorder::default();
        let mut driver = EnrichmentDriver::new(&generator, &recorder);

        let (enriched, report) = driver.enrich(ItemTable::default()).await.unwrap();

        assert!(enriched.is_empty());
        assert_eq!(report.calls(), 0);
        let updates = recorder.0.lock().unwrap();
        assert_eq!(updates.len(), 2);
        assert!(updates.iter().all(|u| u.fraction() == 1.0));
    }

    #[tokio::test(start_paused = true)]
    async fn test_recommendation_prompt_uses_analysis_output() {
        let generator = FakeGenerator::new(None);
        let recorder = Recorder::default();
        let mut driver = EnrichmentDriver::new(&generator, &recorder);

        driver.enrich(table(1)).await.unwrap();

        let prompts = generator.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 2);
        assert!(!prompts[0].contains("A resta."));
        assert!(prompts[1].contains("A resta."));
    }

    #[tokio::test(start_paused = true)]
    async fn test_pacing_delay_after_each_call() {
        let generator = FakeGenerator::new(None);
        let recorder = Recorder::default();
        let mut driver =
            EnrichmentDriver::new(&generator, &recorder).with_request_delay(Duration::from_millis(1000));

        let start = tokio::time::Instant::now();
        driver.enrich(table(3)).await.unwrap();

        // 6 次调用，每次 10ms 加 1000ms 间隔
        assert!(start.elapsed() >= Duration::from_millis(6 * 1010));
    }

    #[tokio::test(start_paused = true)]
    async fn test_bounded_concurrency_preserves_order() {
        let generator = FakeGenerator::new(Some("Pregunta número 2"));
        let recorder = Recorder::default();
        let mut driver = EnrichmentDriver::new(&generator, &recorder).with_max_concurrent(3);

        let (enriched, _) = driver.enrich(table(6)).await.unwrap();

        assert!(generator.max_in_flight.load(Ordering::SeqCst) <= 3);
        assert_eq!(enriched.records()[1].text(QUE_EVALUA).as_deref(), Some(API_ERROR_SENTINEL));
        for (i, record) in enriched.records().iter().enumerate() {
            assert_eq!(record.text("ItemId").unwrap(), format!("MAT-{:02}", i + 1));
        }
    }

    #[tokio::test]
    async fn test_existing_derived_column_is_fatal() {
        let generator = FakeGenerator::new(None);
        let recorder = Recorder::default();
        let mut driver = EnrichmentDriver::new(&generator, &recorder);

        let records = vec![serde_json::from_value::<Record>(json!({
            "ItemId": "MAT-01",
            "Recomendacion_Avanzar": "ya existe"
        }))
        .unwrap()];

        let result = driver.enrich(ItemTable::new(records)).await;

        assert!(matches!(
            result,
            Err(AppError::Table(TableError::ColumnExists { ref column })) if column == RECOMENDACION_AVANZAR
        ));
        assert_eq!(driver.state(), RunState::Failed);
        assert!(generator.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_failures_are_written_to_run_log() {
        let dir = tempfile::tempdir().unwrap();
        let log = FailureLog::with_path(dir.path().join("registro.txt"));
        let generator = FakeGenerator::new(Some("Pregunta número 2"));
        let recorder = Recorder::default();
        let mut driver = EnrichmentDriver::new(&generator, &recorder).with_failure_log(log.clone());

        driver.enrich(table(2)).await.unwrap();

        let content = std::fs::read_to_string(log.path()).unwrap();
        assert!(content.contains("阶段 分析 | 行 2"));
        assert!(content.contains("阶段 建议 | 行 2"));
        assert!(!content.contains("行 1 "));
    }
}
