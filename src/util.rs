use crate::error::{Result, TouchmapError};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Split one CSV line into fields, honoring double-quoted fields with `""`
/// escapes. Embedded newlines are not supported; the datasets this tool
/// reads and writes are strictly line-per-record.
pub fn split_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            } else {
                field.push(c);
            }
        } else if c == '"' {
            in_quotes = true;
        } else if c == ',' {
            fields.push(std::mem::take(&mut field));
        } else {
            field.push(c);
        }
    }
    fields.push(field);
    fields
}

/// Quote a value for CSV output when it needs it.
pub fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') || value.contains('\r') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Read the tracked file list: a CSV with a header naming a `Filename`
/// column (any position), one path per row.
pub fn read_file_list(path: &Path) -> Result<Vec<String>> {
    let reader = BufReader::new(File::open(path)?);
    let mut lines = reader.lines();

    let header = loop {
        match lines.next() {
            Some(line) => {
                let line = line?;
                if !line.trim().is_empty() {
                    break line;
                }
            }
            None => {
                return Err(TouchmapError::Parse(format!(
                    "{}: empty file list",
                    path.display()
                )))
            }
        }
    };

    let column = split_csv_line(header.trim_end_matches('\r'))
        .iter()
        .position(|field| field.trim() == "Filename")
        .ok_or_else(|| {
            TouchmapError::Parse(format!("{}: no 'Filename' column", path.display()))
        })?;

    let mut files = Vec::new();
    for line in lines {
        let line = line?;
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }
        let fields = split_csv_line(line);
        if let Some(name) = fields.get(column) {
            if !name.is_empty() {
                files.push(name.clone());
            }
        }
    }

    Ok(files)
}
