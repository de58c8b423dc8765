mod batch;
mod request;

pub use batch::*;
pub use request::*;
