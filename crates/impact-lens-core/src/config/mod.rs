mod settings;

pub use settings::{EntitlementSettings, Settings, API_BASE_ENV, DEFAULT_API_BASE};
