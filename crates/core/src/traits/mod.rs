pub mod consumer_policy;
pub mod dispatcher;
pub mod host_directory;

pub use consumer_policy::*;
pub use dispatcher::*;
pub use host_directory::*;
