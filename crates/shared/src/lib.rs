//! Wire protocol shared by the session server and its clients

pub mod protocol;

pub use protocol::{ProtocolError, ProtocolResult, Request, Response, WireResponse};
