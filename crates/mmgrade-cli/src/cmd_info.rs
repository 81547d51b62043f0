use std::path::PathBuf;

pub fn execute(paths: &[PathBuf]) -> anyhow::Result<()> {
    let tables = crate::tables::load_tables(paths)?;
    if tables.is_empty() {
        println!("no csv tables found");
        return Ok(());
    }
    for (name, table) in &tables {
        println!("{name}: {} rows", table.len());
        println!("  columns: {}", table.headers().join(", "));
    }
    Ok(())
}
