use crate::github::RawCommit;
use crate::model::{AuthorIdentity, Precision, TouchRecord};
use chrono::{DateTime, Utc};

/// Turn one raw commit into a touch record. `None` means the commit carried
/// no usable timestamp; the caller counts it as skipped.
pub fn extract(file: &str, raw: &RawCommit, precision: Precision) -> Option<TouchRecord> {
    let timestamp = raw
        .commit
        .as_ref()
        .and_then(|c| c.author.as_ref())
        .and_then(|sig| sig.date.as_deref())
        .and_then(parse_timestamp)?;

    Some(TouchRecord {
        file: file.to_string(),
        author: resolve_author(raw),
        timestamp: precision.apply(timestamp),
    })
}

/// Prefer the platform login when the commit maps to a registered account,
/// fall back to the commit author name, else the unknown sentinel. Empty
/// strings never count as present.
pub fn resolve_author(raw: &RawCommit) -> AuthorIdentity {
    if let Some(login) = raw.author.as_ref().and_then(|a| a.login.as_deref()) {
        if !login.is_empty() {
            return AuthorIdentity::Login(login.to_string());
        }
    }
    if let Some(name) = raw
        .commit
        .as_ref()
        .and_then(|c| c.author.as_ref())
        .and_then(|sig| sig.name.as_deref())
    {
        if !name.is_empty() {
            return AuthorIdentity::Name(name.to_string());
        }
    }
    AuthorIdentity::Unknown
}

fn parse_timestamp(date: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(date)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
