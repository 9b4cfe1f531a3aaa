//! Flat delimited-text format: a comma-separated header line naming the
//! columns, then one comma-separated record per line. No quoting or
//! escaping; the inverse of `serialize` is `parse`.

use crate::core::Table;

/// Parses source text into a header and records. Every record must have
/// exactly as many fields as the header.
pub fn parse(text: &str) -> Result<(Vec<String>, Vec<Vec<String>>), String> {
    let mut lines = text.lines().enumerate();
    let (_, header) = lines.next().ok_or_else(|| "source is empty".to_string())?;
    if header.trim().is_empty() {
        return Err("source is empty".to_string());
    }
    let columns: Vec<String> = header.split(',').map(str::to_string).collect();

    let mut records = Vec::new();
    for (number, line) in lines {
        if line.is_empty() {
            continue;
        }
        let record: Vec<String> = line.split(',').map(str::to_string).collect();
        if record.len() != columns.len() {
            return Err(format!(
                "line {}: expected {} field(s), found {}",
                number + 1,
                columns.len(),
                record.len()
            ));
        }
        records.push(record);
    }
    Ok((columns, records))
}

/// Serializes a table back to the text format, header line first. Row order
/// is preserved.
#[must_use]
pub fn serialize(table: &Table) -> String {
    let mut out = table.columns().join(",");
    out.push('\n');
    for row in table.rows().iter() {
        out.push_str(&row.snapshot().join(","));
        out.push('\n');
    }
    out
}
