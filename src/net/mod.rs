//! HTTP plumbing: wire types, request values, transport and the pipeline
//! every API call goes through.

pub mod pipeline;
pub mod request;
pub mod transport;
pub mod types;
