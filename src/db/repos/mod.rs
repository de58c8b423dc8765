mod manifests;
mod sessions;

pub use manifests::*;
pub use sessions::*;
