use mmgrade_table::{load_csv_dir, read_csv, Table};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Table name for a CSV path: the file stem.
pub fn table_name(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("table")
        .to_string()
}

/// Load tables from a mix of CSV files and directories.
///
/// Directories are scanned for `*.csv` (unreadable files are skipped with
/// a warning); an explicitly named file that fails to read is an error.
pub fn load_tables(paths: &[PathBuf]) -> anyhow::Result<BTreeMap<String, Table>> {
    let mut tables = BTreeMap::new();
    for path in paths {
        if path.is_dir() {
            tables.append(&mut load_csv_dir(path)?);
        } else {
            let name = table_name(path);
            let table = read_csv(&name, path)?;
            tables.insert(name, table);
        }
    }
    Ok(tables)
}
