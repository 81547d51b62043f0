mod ingest;
mod table;

pub use ingest::{load_csv_dir, read_csv};
pub use table::{cell_as_index, Table, TableError};
