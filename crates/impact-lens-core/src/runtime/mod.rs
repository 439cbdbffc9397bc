//! Wiring of the three contexts behind one facade.

pub mod builder;
pub mod core;
pub mod events;

pub use builder::ImpactLensBuilder;
pub use self::core::ImpactLens;
pub use events::ExtensionEvent;
