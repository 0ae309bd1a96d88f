pub mod init;
pub mod month;
pub mod record;
pub mod root;
pub mod show;
pub mod summary;
