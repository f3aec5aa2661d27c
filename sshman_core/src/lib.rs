pub mod exec;
pub mod model;
pub mod remote;
pub mod store;
pub mod utils;

// re-export the types most callers need
pub use model::{ConnectionRecord, ConnectionSet};
pub use store::ConfigStore;
