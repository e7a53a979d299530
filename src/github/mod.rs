pub mod client;
pub mod commit;

pub use client::{ClientConfig, GithubClient, RateGate};
pub use commit::{RawAccount, RawCommit, RawCommitData, RawSignature};
