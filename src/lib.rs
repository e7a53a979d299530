pub mod cli;
pub mod error;
pub mod github;
pub mod mine;
pub mod model;
pub mod plot;
pub mod util;

pub use error::{Result, TouchmapError};
