pub mod app_config;
pub mod assignment;
pub mod gate;
pub mod observability;

// Re-export main types for easier imports
pub use app_config::AppConfig;
pub use assignment::AssignmentConfig;
pub use gate::{ConsumerConfig, EventScope, GateConfig};
pub use observability::ObservabilityConfig;
