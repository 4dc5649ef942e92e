pub mod row_ctx;
pub mod row_enricher;

pub use row_ctx::RowCtx;
pub use row_enricher::{RowEnricher, RowOutcome};
