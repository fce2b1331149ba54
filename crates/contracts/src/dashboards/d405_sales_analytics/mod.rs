pub mod decode;
pub mod dto;

pub use decode::*;
pub use dto::*;
