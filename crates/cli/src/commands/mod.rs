pub mod chat;
pub mod init;
pub mod kb;
pub mod status;
