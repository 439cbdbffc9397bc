//! Core library for impact-lens.
//!
//! The extension is split into three execution contexts that share no memory:
//! the page script (content extraction), the background worker (quota and
//! analysis) and the side panel (orchestration and rendering). Each context is
//! a tokio task; [`messaging::MessageRouter`] relays correlated requests
//! between them.
//!
//! Consumers should build an [`runtime::ImpactLens`] through
//! [`runtime::ImpactLensBuilder`] rather than wiring contexts by hand.

pub mod analysis;
pub mod config;
pub mod content;
pub mod contexts;
pub mod entitlement;
pub mod i18n;
pub mod messaging;
pub mod panel;
pub mod runtime;
pub mod storage;
pub mod usage;

#[cfg(test)]
pub(crate) mod test_support;
