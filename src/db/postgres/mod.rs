mod manifests;
mod sessions;

pub use manifests::PostgresBatchManifestRepo;
pub use sessions::PostgresSessionRepo;
