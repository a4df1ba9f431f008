pub mod csv_export;
pub mod csv_import;
pub mod store;

pub use csv_export::{export_csv, to_csv_string, write_csv};
pub use csv_import::{import_csv, parse_csv};
pub use store::{JsonFileStore, MemoryStore, Store};
