use crate::model::{AuthorCount, PlotPoint, TouchRow};
use chrono::{DateTime, Utc};
use std::collections::{BTreeSet, HashMap};

/// Stable integer indices for plotting: sorted distinct file paths to
/// [0, n), sorted distinct authors to [0, m), both lexicographic over the
/// raw string.
pub struct PlotIndex {
    files: Vec<String>,
    authors: Vec<String>,
    file_indices: HashMap<String, usize>,
    author_indices: HashMap<String, usize>,
}

impl PlotIndex {
    pub fn build(rows: &[TouchRow]) -> Self {
        let files: Vec<String> = rows
            .iter()
            .map(|r| r.file.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let authors: Vec<String> = rows
            .iter()
            .map(|r| r.author.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let file_indices = files
            .iter()
            .enumerate()
            .map(|(index, file)| (file.clone(), index))
            .collect();
        let author_indices = authors
            .iter()
            .enumerate()
            .map(|(index, author)| (author.clone(), index))
            .collect();

        Self {
            files,
            authors,
            file_indices,
            author_indices,
        }
    }

    pub fn files(&self) -> &[String] {
        &self.files
    }

    pub fn authors(&self) -> &[String] {
        &self.authors
    }

    pub fn file_index(&self, file: &str) -> Option<usize> {
        self.file_indices.get(file).copied()
    }

    pub fn author_index(&self, author: &str) -> Option<usize> {
        self.author_indices.get(author).copied()
    }

    /// One point per row, in row order.
    pub fn points(&self, rows: &[TouchRow], start: DateTime<Utc>) -> Vec<PlotPoint> {
        rows.iter()
            .filter_map(|row| {
                let (Some(file_index), Some(author_index)) =
                    (self.file_index(&row.file), self.author_index(&row.author))
                else {
                    return None;
                };
                Some(PlotPoint {
                    week_index: super::bucket::week_index(start, row.timestamp),
                    file_index,
                    author_index,
                })
            })
            .collect()
    }
}

/// The k most-touching authors, count descending, ties broken by the same
/// lexicographic order the author index uses.
pub fn top_authors(rows: &[TouchRow], k: usize) -> Vec<AuthorCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for row in rows {
        *counts.entry(row.author.as_str()).or_insert(0) += 1;
    }

    let mut ranked: Vec<AuthorCount> = counts
        .into_iter()
        .map(|(author, touches)| AuthorCount {
            author: author.to_string(),
            touches,
        })
        .collect();
    ranked.sort_by(|a, b| b.touches.cmp(&a.touches).then_with(|| a.author.cmp(&b.author)));
    ranked.truncate(k);
    ranked
}
