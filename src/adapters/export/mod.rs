//! Plan export adapters.

mod local_file_exporter;

pub use local_file_exporter::LocalFileExporter;
