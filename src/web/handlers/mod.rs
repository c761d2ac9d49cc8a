pub mod dir_ops;
pub mod file_ops;
pub mod upload_ops;
