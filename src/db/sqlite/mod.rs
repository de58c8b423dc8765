mod common;
mod manifests;
mod sessions;

pub use manifests::SqliteBatchManifestRepo;
pub use sessions::SqliteSessionRepo;

/// Bound parameters per statement. Older SQLite builds cap this at 999
/// (SQLITE_LIMIT_VARIABLE_NUMBER).
const SQLITE_MAX_VARIABLES: usize = 999;

/// Manifest rows per insert statement; each row binds 5 parameters.
const MANIFEST_ROWS_PER_INSERT: usize = SQLITE_MAX_VARIABLES / 5;

/// Ids per `IN (...)` delete statement; each id binds 1 parameter.
const IDS_PER_DELETE: usize = SQLITE_MAX_VARIABLES;
