//! Rescoring Integration Tests
//!
//! End-to-end tests through the facade crate, organized by how a host uses
//! the kernel:
//! - Host pipeline: settings file, request parsing, TopDocs, explanations
//! - Shards: parallel rescoring over disjoint candidate lists
//! - Wire transfer: configs shipped between nodes as bytes

#[path = "../common/mod.rs"]
mod common;

mod host_pipeline;
mod shards;
mod wire_transfer;
