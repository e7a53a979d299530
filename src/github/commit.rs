use serde::Deserialize;

/// One commit object as the commits listing returns it. Only the fields the
/// extractor reads are modeled; everything is optional because the platform
/// author is null for unregistered committers and commit metadata can be
/// incomplete.
#[derive(Debug, Clone, Deserialize)]
pub struct RawCommit {
    pub author: Option<RawAccount>,
    pub commit: Option<RawCommitData>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawAccount {
    pub login: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawCommitData {
    pub author: Option<RawSignature>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawSignature {
    pub name: Option<String>,
    pub date: Option<String>,
}
