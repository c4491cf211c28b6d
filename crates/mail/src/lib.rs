// 声明子模块
pub mod brevo;
pub mod config;
pub mod types;

pub use brevo::BrevoMailer;
pub use config::MailConfig;
pub use types::{EmailRequest, EmailResponse};
