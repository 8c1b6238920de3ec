pub mod codec;
pub mod error;
pub mod resolve;
pub mod spec;
pub mod tensor;

pub use codec::*;
pub use error::*;
pub use resolve::*;
pub use spec::*;
pub use tensor::*;
