pub mod error;
pub mod model;
pub mod validate;

// 导出让外部使用
pub use error::*;
pub use model::*;
