pub mod introspect;
pub mod resolve;
pub mod types;

pub use introspect::*;
pub use resolve::*;
pub use types::*;
