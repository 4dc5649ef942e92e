pub mod table_loader;

pub use table_loader::{load_table, parse_table, render_table, save_table, strip_html, TableFormat};
