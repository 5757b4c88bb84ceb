//! Reading batch requests and writing batched results.
//!
//! Both files are JSON objects keyed by molecule identifier. Key order is kept as read
//! and as inserted so that a batch always serializes to the same file.

pub mod batch;
