//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责整表处理和流程调度，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `batch_processor` - 批量处理器
//! - 管理应用生命周期（初始化、运行）
//! - 持有生成客户端
//! - 保存表格、写出压缩包
//! - 输出全局统计信息
//!
//! ### `enrichment_driver` - 表格增强驱动
//! - 按阶段遍历所有行
//! - 控制并发数量和调用间隔
//! - 追加派生列、上报进度、记录失败行
//!
//! ### `assembler` - 文档组装
//! - 每行渲染一份文档
//! - 文件命名与去重
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (一次运行)
//!     ↓
//! enrichment_driver (处理 ItemTable) / assembler (ItemTable → zip)
//!     ↓
//! workflow::RowEnricher (处理单行)
//!     ↓
//! services (能力层：segment / render / archive / failure log)
//!     ↓
//! clients (基础设施：TextGenerator)
//! ```
//!
//! ## 设计原则
//!
//! 1. **单一职责**：batch_processor 管输入输出，enrichment_driver 管行调度
//! 2. **资源隔离**：只有编排层持有生成客户端和表格
//! 3. **向下依赖**：编排层 → workflow → services → clients
//! 4. **无业务逻辑**：只做调度和统计，不解析模型输出

pub mod assembler;
pub mod batch_processor;
pub mod enrichment_driver;

// 重新导出主要类型
pub use assembler::{assemble, DocumentArchive};
pub use batch_processor::{assemble_file, App};
pub use enrichment_driver::{
    enrich, EnrichmentDriver, EnrichmentReport, LogProgress, PassStats, ProgressReporter,
    ProgressUpdate, RunState,
};
