pub mod bytes_reader;
pub mod bytes_writer;
pub mod bytesio;
pub mod bytesio_errors;
