//! HTTP API: server, routing, and request/response mapping.
//!
//! Everything in here is thin glue from HTTP verbs to repository calls;
//! authentication, file upload, and outbound email live outside this
//! service and are not part of this crate.

pub mod app;
