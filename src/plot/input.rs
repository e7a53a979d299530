use crate::error::{Result, TouchmapError};
use crate::model::TouchRow;
use crate::util::split_csv_line;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

// `timestamp`/`date` are what mine writes; `date_iso` keeps datasets from
// the older mining scripts loadable.
const TIME_COLUMNS: [&str; 3] = ["timestamp", "date", "date_iso"];

/// Load a dataset CSV: `file` and `author` columns plus one time column.
pub fn read_touches(path: &Path) -> Result<Vec<TouchRow>> {
    let reader = BufReader::new(File::open(path)?);
    let mut lines = reader.lines().enumerate();

    let header = loop {
        match lines.next() {
            Some((_, line)) => {
                let line = line?;
                if !line.trim().is_empty() {
                    break line;
                }
            }
            None => {
                return Err(TouchmapError::Parse(format!(
                    "{}: empty dataset",
                    path.display()
                )))
            }
        }
    };

    let columns = split_csv_line(header.trim_end_matches('\r'));
    let file_idx = position(&columns, "file", path)?;
    let author_idx = position(&columns, "author", path)?;
    let time_idx = TIME_COLUMNS
        .iter()
        .find_map(|name| columns.iter().position(|c| c.trim() == *name))
        .ok_or_else(|| {
            TouchmapError::Parse(format!(
                "{}: no time column (expected one of timestamp, date, date_iso)",
                path.display()
            ))
        })?;

    let mut rows = Vec::new();
    for (number, line) in lines {
        let line = line?;
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }

        let fields = split_csv_line(line);
        let (Some(file), Some(author), Some(value)) = (
            fields.get(file_idx),
            fields.get(author_idx),
            fields.get(time_idx),
        ) else {
            return Err(TouchmapError::Parse(format!(
                "{}: line {}: expected {} columns, got {}",
                path.display(),
                number + 1,
                columns.len(),
                fields.len()
            )));
        };

        let timestamp = parse_row_timestamp(value).ok_or_else(|| {
            TouchmapError::InvalidTimestamp(format!(
                "{}: line {}: '{}'",
                path.display(),
                number + 1,
                value
            ))
        })?;

        rows.push(TouchRow {
            file: file.clone(),
            author: author.clone(),
            timestamp,
        });
    }

    Ok(rows)
}

fn position(columns: &[String], name: &str, path: &Path) -> Result<usize> {
    columns
        .iter()
        .position(|c| c.trim() == name)
        .ok_or_else(|| TouchmapError::Parse(format!("{}: no '{}' column", path.display(), name)))
}

/// RFC 3339 (trailing `Z` included) first, then plain dates at midnight UTC.
pub fn parse_row_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        if let Some(datetime) = date.and_hms_opt(0, 0, 0) {
            return Some(Utc.from_utc_datetime(&datetime));
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    fn write_csv(dir: &tempfile::TempDir, content: &str) -> std::path::PathBuf {
        let path = dir.path().join("touches.csv");
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn reads_instant_datasets() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(
            &dir,
            "file,author,timestamp\nsrc/A.java,alice,2013-01-05T12:00:00Z\n\"b,c.java\",\"Last, First\",2013-01-06T00:00:00Z\n",
        );

        let rows = read_touches(&path).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].file, "src/A.java");
        assert_eq!(rows[0].author, "alice");
        assert_eq!(rows[0].timestamp.to_rfc3339(), "2013-01-05T12:00:00+00:00");
        assert_eq!(rows[1].file, "b,c.java");
        assert_eq!(rows[1].author, "Last, First");
    }

    #[test]
    fn reads_day_and_legacy_headers() {
        let dir = tempfile::tempdir().unwrap();

        let day = write_csv(&dir, "file,author,date\nA.java,alice,2013-01-05\n");
        let rows = read_touches(&day).unwrap();
        assert_eq!(rows[0].timestamp.to_rfc3339(), "2013-01-05T00:00:00+00:00");

        let legacy = write_csv(&dir, "file,author,date_iso\nA.java,alice,2013-01-05T09:30:00Z\n");
        let rows = read_touches(&legacy).unwrap();
        assert_eq!(rows[0].timestamp.to_rfc3339(), "2013-01-05T09:30:00+00:00");
    }

    #[test]
    fn missing_columns_are_errors() {
        let dir = tempfile::tempdir().unwrap();

        let path = write_csv(&dir, "file,timestamp\nA.java,2013-01-05T00:00:00Z\n");
        let err = read_touches(&path).unwrap_err();
        assert!(err.to_string().contains("'author'"));

        let path = write_csv(&dir, "file,author,when\nA.java,alice,2013-01-05\n");
        let err = read_touches(&path).unwrap_err();
        assert!(err.to_string().contains("time column"));
    }

    #[test]
    fn bad_timestamp_names_the_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(
            &dir,
            "file,author,timestamp\nA.java,alice,2013-01-05T00:00:00Z\nB.java,bob,yesterday\n",
        );

        let err = read_touches(&path).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("line 3"), "{message}");
        assert!(message.contains("yesterday"), "{message}");
    }
}
