pub mod csv;

pub use self::csv::{write_rows_csv, write_rows_csv_to};
pub use ::csv::Error as CsvError;
