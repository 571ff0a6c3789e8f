//! # Serenity BrowserStack
//!
//! Prepares remote WebDriver sessions on BrowserStack. Properties prefixed
//! with `browserstack.` are renamed from their legacy names to W3C names and
//! split between top-level capabilities (`browserName`, `browserVersion`,
//! `server`, `user`, `key`) and the `bstack:options` capability.

mod capabilities;
mod error;
mod scenario;

pub use capabilities::{DesiredCapabilities, Platform, SupportedWebDriver};
pub use error::BrowserStackError;
pub use scenario::{
    BeforeABrowserStackScenario, BeforeAWebdriverScenario, CapabilityKeyMapping, TestOutcome,
    BROWSERSTACK_PREFIX, BSTACK_OPTIONS, NON_BSTACK_PROPERTIES,
};

/// Returns a version string for the Serenity BrowserStack crate
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
