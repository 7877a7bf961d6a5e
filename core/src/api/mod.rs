//! Resource API modules, one per REST resource.
//!
//! Each operation has a pure `build_*` function producing an `ApiRequest`
//! and an `ApiClient` method that sends it, validates the status with an
//! operation-specific message and decodes the body.

pub mod auth;
pub mod task;
pub mod todo;
