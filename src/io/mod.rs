pub mod csv_writer;
pub mod json_writer;
pub mod npy;
pub mod summary;
