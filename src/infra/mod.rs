pub mod tsv_table_adapter;

pub use tsv_table_adapter::TsvFileAdapter;
