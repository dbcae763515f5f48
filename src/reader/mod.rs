//! XML Reader Module
//!
//! - Events: XML event types for pull parsing
//! - Stream: `EventReader`, the pull parser over a byte stream
//! - Factory: `XmlInputFactory`, creates readers from streams

pub mod events;
pub mod factory;
pub mod stream;
