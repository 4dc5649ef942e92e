pub mod loaders;
pub mod pass;
pub mod record;
pub mod table;

pub use loaders::{load_table, save_table, strip_html};
pub use pass::PassKind;
pub use record::Record;
pub use table::ItemTable;
