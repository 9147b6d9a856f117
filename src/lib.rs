pub mod limits;
pub mod model;
pub mod monitor;
pub mod observability;
pub mod resolver;
pub mod seed;
pub mod store;
pub mod wal;
