pub mod archive_writer;
pub mod failure_log;
pub mod segmenter;
pub mod template_renderer;

pub use archive_writer::{sanitize_file_name, ArchiveWriter, FileNamer};
pub use failure_log::FailureLog;
pub use segmenter::{segment, SegmentedResult};
pub use template_renderer::{PlaceholderTemplate, TemplateRenderer};
