pub mod csv_file;

pub use csv_file::{file_size, read_records, write_records};
