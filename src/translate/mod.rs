pub mod error;
pub mod handler;
pub mod interface;
pub mod normalize;
pub mod prompt;

pub use error::*;
pub use handler::*;
pub use interface::*;
