mod error;
mod info;
mod parser;
mod serialize;

pub use error::SgfError;
pub use info::GameInfo;
pub use parser::parse;
pub use serialize::{serialize, serialize_from};
