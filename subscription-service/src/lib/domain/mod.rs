pub mod catalog;
pub mod subscription;
