pub mod dedupe;
pub mod exec;
pub mod extract;
pub mod fetch;
pub mod output;

pub use dedupe::Deduper;
pub use exec::exec;
pub use extract::{extract, resolve_author};
pub use fetch::{mine_file, mine_files, FileResult};
pub use output::{output_json, output_ndjson, output_summary, write_touches_csv};
