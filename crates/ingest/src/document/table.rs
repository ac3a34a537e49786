//! Canonical text rendering for extracted tables.

use tracing::warn;

use super::TableGrid;

/// Render a table grid as marker-wrapped text for embedding: cells joined
/// by `" | "`, rows by newline, the block fenced with `[TABLE]`/`[/TABLE]`
/// so tabular content stays distinguishable from prose after indexing.
///
/// Returns `None` for a zero-row grid; table extraction is best-effort and
/// an empty table is dropped with a warning rather than failing the page.
pub fn format_table(grid: &TableGrid) -> Option<String> {
    if grid.is_empty() {
        warn!("skipping table with no rows");
        return None;
    }

    let body = grid
        .iter()
        .map(|row| row.join(" | "))
        .collect::<Vec<_>>()
        .join("\n");

    Some(format!("[TABLE]\n{body}\n[/TABLE]"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&[&str]]) -> TableGrid {
        rows.iter()
            .map(|row| row.iter().map(|cell| cell.to_string()).collect())
            .collect()
    }

    #[test]
    fn formats_cells_and_rows_with_markers() {
        let formatted = format_table(&grid(&[&["a", "b"], &["c", ""]])).unwrap();
        assert_eq!(formatted, "[TABLE]\na | b\nc | \n[/TABLE]");
    }

    #[test]
    fn empty_cells_keep_their_position() {
        let formatted = format_table(&grid(&[&["", "x", ""]])).unwrap();
        assert_eq!(formatted, "[TABLE]\n | x | \n[/TABLE]");
    }

    #[test]
    fn single_row_table_is_kept() {
        let formatted = format_table(&grid(&[&["only", "row"]])).unwrap();
        assert_eq!(formatted, "[TABLE]\nonly | row\n[/TABLE]");
    }

    #[test]
    fn zero_rows_are_omitted() {
        assert!(format_table(&Vec::new()).is_none());
    }
}
