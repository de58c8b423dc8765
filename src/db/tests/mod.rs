//! Shared database repository test infrastructure
//!
//! Each repository has a test module containing shared test functions that
//! take `&dyn XxxRepo`, run against in-memory SQLite on every `cargo test`
//! and against PostgreSQL (testcontainers, `#[ignore]`) with
//! `cargo test -- --ignored`.

mod manifests;
mod sessions;
