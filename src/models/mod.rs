//! Data models shared by the catalog engine and the stream pipeline

pub mod catalog;
pub mod channel;
pub mod stream;

pub use catalog::*;
pub use channel::*;
pub use stream::*;
