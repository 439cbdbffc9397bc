//! Page and background execution contexts.
//!
//! The panel context lives in [`crate::panel`]; it only sends requests and
//! never serves any.

pub mod background;
pub mod page;

pub use background::BackgroundContext;
pub use page::PageContext;
