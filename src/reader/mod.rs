pub mod aggregated;
pub mod stream_reader;
