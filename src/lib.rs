pub mod cli;
pub mod error;
pub mod logging;
pub mod prelude;
pub mod schema;
pub mod table;
pub mod value;
pub mod writer;

pub use cli::{Cli, Commands};
pub use error::{Error, Result};
pub use value::WideString;
