pub mod chat;
pub mod health;
pub mod optimize;
pub mod reverse;
