pub mod error;

pub use error::{FrontdeskError, Result};
