//! CSV adapters: salary file input, injury lists and lineup output.

pub mod injury;
pub mod pool;
pub mod writer;

pub use injury::{load_injury_list, read_injury_list};
pub use pool::SalaryFile;
pub use writer::{CsvLineupWriter, OutputFiles};
