pub mod chat;
pub mod email;
pub mod health;
pub mod optimize;
pub mod reverse;
