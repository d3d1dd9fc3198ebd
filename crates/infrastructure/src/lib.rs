pub mod dispatchers;
pub mod in_memory_directory;
pub mod metrics_collector;
pub mod plan_file;

pub use dispatchers::*;
pub use in_memory_directory::*;
pub use metrics_collector::*;
pub use plan_file::*;
