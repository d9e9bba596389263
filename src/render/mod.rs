//! Output rendering

pub mod compdb;

pub use compdb::{fixed_output_path, read_database, write_database};
