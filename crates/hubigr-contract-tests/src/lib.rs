//! JSON-schema contract checks for the profile API payloads.
//!
//! Schemas and fixtures live in the workspace `contracts/` directory. This
//! crate only hosts the tests in `tests/`.
