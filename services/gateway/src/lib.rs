pub mod error;
pub mod logging;
pub mod middleware;
pub mod serializers;
pub mod settings;
pub mod state;
pub mod urls;
pub mod views;

pub use settings::Settings;
pub use state::AppState;
