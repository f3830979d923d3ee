//! Request handlers for the `/cloud` API

pub mod bucket;
pub mod file;
pub mod service;
pub mod share;
pub mod transfer;

pub use bucket::*;
pub use file::*;
pub use service::*;
pub use share::*;
pub use transfer::*;
