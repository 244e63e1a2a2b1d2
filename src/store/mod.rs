pub mod error;
pub mod pool;
pub mod turns;

pub use error::StoreError;
pub use pool::DatabasePool;
pub use turns::TurnStore;
