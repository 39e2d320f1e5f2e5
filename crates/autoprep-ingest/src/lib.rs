pub mod csv_table;
pub mod profiling;

pub use csv_table::{CsvTable, read_csv_frame, read_csv_table, read_csv_table_from_reader};
pub use profiling::{build_column_profiles, is_identifier_name};
