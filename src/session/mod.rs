pub mod controller;
pub mod registry;
pub mod types;

pub use controller::{LoadOutcome, SessionController};
pub use registry::SessionRegistry;
pub use types::{Role, Turn};
