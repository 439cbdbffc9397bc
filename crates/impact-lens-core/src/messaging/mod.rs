//! Request/response relay between execution contexts.

pub mod protocol;
pub mod router;

pub use protocol::{Endpoint, Envelope, Request, Response, TabId};
pub use router::{Handler, MessageRouter, RouterError};
