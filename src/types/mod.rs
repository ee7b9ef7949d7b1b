mod error;
mod order;
mod package;

pub use error::*;
pub use order::*;
pub use package::*;
