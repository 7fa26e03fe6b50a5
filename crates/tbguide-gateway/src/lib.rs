//! # TbGuide Gateway
//!
//! HTTP surface for the retrieval engine: one stateless `ask` operation
//! plus health and corpus introspection endpoints. All algorithmic work
//! lives in `tbguide-retrieval` and `tbguide-tables`; this crate decodes
//! requests, runs the pipeline, and maps errors onto status classes.

pub mod routes;
pub mod server;

pub use server::{AppState, build_router, start};
