use crate::Table;
use anyhow::Context;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

/// Read one CSV file into a named table.
///
/// The first record is the header row; every cell becomes a string value.
pub fn read_csv(name: &str, path: &Path) -> anyhow::Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("open {}", path.display()))?;

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let mut columns: Vec<Vec<Value>> = vec![Vec::new(); headers.len()];

    for (row, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("{}: record {row}", path.display()))?;
        for (i, column) in columns.iter_mut().enumerate() {
            column.push(Value::String(record.get(i).unwrap_or("").to_string()));
        }
    }

    let columns = headers.into_iter().zip(columns).collect();
    Ok(Table::new(name, columns)?)
}

/// Load every `*.csv` file in a directory into a name → table map.
///
/// Table names are file stems. A file that fails to parse is logged and
/// skipped so the remaining files still load.
pub fn load_csv_dir(dir: &Path) -> anyhow::Result<BTreeMap<String, Table>> {
    let mut tables = BTreeMap::new();
    for entry in std::fs::read_dir(dir).with_context(|| format!("read {}", dir.display()))? {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) != Some("csv") {
            continue;
        }
        let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        match read_csv(name, &path) {
            Ok(table) => {
                tables.insert(name.to_string(), table);
            }
            Err(err) => {
                tracing::warn!(file = %path.display(), "skipping unreadable csv: {err:#}");
            }
        }
    }
    Ok(tables)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn read_csv_preserves_shape() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_file(
            tmp.path(),
            "run.csv",
            "question,answer,response\nq1,0,\"User: a Assistant: A\"\nq2,1,\"User: b Assistant: B\"\n",
        );

        let table = read_csv("run", &path).unwrap();
        assert_eq!(table.name(), "run");
        assert_eq!(table.headers(), &["question", "answer", "response"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.cell("answer", 1).unwrap(), &serde_json::json!("1"));
        assert_eq!(
            table.cell("response", 0).unwrap(),
            &serde_json::json!("User: a Assistant: A")
        );
    }

    #[test]
    fn read_csv_missing_file_errors() {
        assert!(read_csv("x", Path::new("/nonexistent/x.csv")).is_err());
    }

    #[test]
    fn load_dir_names_tables_by_stem() {
        let tmp = tempfile::tempdir().unwrap();
        write_file(tmp.path(), "gpt4.csv", "a,b\n1,2\n");
        write_file(tmp.path(), "llava.csv", "a,b\n3,4\n");
        write_file(tmp.path(), "notes.txt", "ignored");

        let tables = load_csv_dir(tmp.path()).unwrap();
        assert_eq!(
            tables.keys().collect::<Vec<_>>(),
            vec!["gpt4", "llava"]
        );
        assert_eq!(tables["gpt4"].len(), 1);
    }

    #[test]
    fn load_dir_skips_unparseable_files() {
        let tmp = tempfile::tempdir().unwrap();
        write_file(tmp.path(), "good.csv", "a,b\n1,2\n");
        // ragged record: three fields under a two-field header
        write_file(tmp.path(), "bad.csv", "a,b\n1,2,3\n");

        let tables = load_csv_dir(tmp.path()).unwrap();
        assert_eq!(tables.keys().collect::<Vec<_>>(), vec!["good"]);
    }
}
