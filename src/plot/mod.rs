pub mod bucket;
pub mod exec;
pub mod index;
pub mod input;
pub mod output;

pub use bucket::{start_of, week_index};
pub use exec::exec;
pub use index::{top_authors, PlotIndex};
pub use input::read_touches;
pub use output::{output_json, output_ndjson, output_table};
