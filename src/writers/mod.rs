pub mod dataset_writer;
pub mod processed_writer;

pub use dataset_writer::DatasetWriter;
pub use processed_writer::write_aggregated_csv;
