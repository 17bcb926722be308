//! Workspace root stub.
//!
//! Exists so the root package can carry shared developer tooling
//! (cargo-husky git hooks). All functionality lives in `crates/`.
