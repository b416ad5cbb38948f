// Adapters for the I/O the pipeline depends on
pub mod archive;
pub mod http_client;
pub mod output_writer;
