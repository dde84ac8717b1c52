pub mod cli;
pub mod session;

// Curated re-exports
pub use cli::Cli;
pub use hx_config::BackdropConfig;
pub use session::{ConfigReport, SessionPlugin};
