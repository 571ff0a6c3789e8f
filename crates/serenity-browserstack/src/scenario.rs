use serde_json::{Map, Value};
use serenity_core::EnvironmentVariables;
use std::collections::BTreeMap;
use tracing::debug;

use crate::capabilities::{DesiredCapabilities, Platform, SupportedWebDriver};
use crate::error::BrowserStackError;

/// Prefix of the BrowserStack properties
pub const BROWSERSTACK_PREFIX: &str = "browserstack.";

/// Capability holding the vendor-specific options
pub const BSTACK_OPTIONS: &str = "bstack:options";

/// Keys set as top-level capabilities rather than BrowserStack options
pub const NON_BSTACK_PROPERTIES: &[&str] = &["browserName", "browserVersion", "server", "user", "key"];

/// The scenario a WebDriver session is being opened for
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestOutcome {
    pub story_title: String,
    pub title: String,
}

impl TestOutcome {
    pub fn new(story_title: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            story_title: story_title.into(),
            title: title.into(),
        }
    }

    /// `<story title> - <test title>`
    pub fn session_name(&self) -> String {
        format!("{} - {}", self.story_title, self.title)
    }
}

/// Adjusts capabilities before a WebDriver session starts for a scenario
pub trait BeforeAWebdriverScenario {
    fn apply(
        &self,
        environment: &EnvironmentVariables,
        driver: SupportedWebDriver,
        outcome: &TestOutcome,
        capabilities: DesiredCapabilities,
    ) -> Result<DesiredCapabilities, BrowserStackError>;
}

/// Legacy BrowserStack capability names and their W3C equivalents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilityKeyMapping {
    legacy_to_w3c: BTreeMap<String, String>,
}

impl Default for CapabilityKeyMapping {
    fn default() -> Self {
        Self::from_pairs([
            ("os_version", "osVersion"),
            ("browser", "browserName"),
            ("browser_version", "browserVersion"),
            ("build", "buildName"),
            ("device", "deviceName"),
            ("appium_version", "appiumVersion"),
        ])
    }
}

impl CapabilityKeyMapping {
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            legacy_to_w3c: pairs
                .into_iter()
                .map(|(legacy, w3c)| (legacy.into(), w3c.into()))
                .collect(),
        }
    }

    /// The W3C name of a key; keys without a mapping are already W3C names
    pub fn w3c_key<'a>(&'a self, key: &'a str) -> &'a str {
        self.legacy_to_w3c.get(key).map(String::as_str).unwrap_or(key)
    }
}

/// Routes `browserstack.*` properties into the capabilities of remote sessions.
///
/// ```
/// use serenity_browserstack::{
///     BeforeABrowserStackScenario, BeforeAWebdriverScenario, DesiredCapabilities,
///     SupportedWebDriver, TestOutcome,
/// };
/// use serenity_core::EnvironmentVariables;
///
/// let environment = EnvironmentVariables::new()
///     .with_property("browserstack.browser", "chrome")
///     .with_property("browserstack.os_version", "11");
///
/// let capabilities = BeforeABrowserStackScenario::default()
///     .apply(
///         &environment,
///         SupportedWebDriver::Remote,
///         &TestOutcome::new("Checkout", "pays by card"),
///         DesiredCapabilities::new(),
///     )
///     .unwrap();
///
/// assert_eq!(capabilities.capability("browserName").unwrap(), "chrome");
/// let options = capabilities.capability("bstack:options").unwrap();
/// assert_eq!(options["osVersion"], "11");
/// assert_eq!(options["sessionName"], "Checkout - pays by card");
/// ```
#[derive(Debug, Clone, Default)]
pub struct BeforeABrowserStackScenario {
    key_mapping: CapabilityKeyMapping,
}

impl BeforeABrowserStackScenario {
    pub fn new(key_mapping: CapabilityKeyMapping) -> Self {
        Self { key_mapping }
    }

    fn w3c_key<'a>(&'a self, property: &'a str) -> &'a str {
        self.key_mapping.w3c_key(unprefixed(property))
    }

    fn is_w3c_property(&self, property: &str) -> bool {
        let key = self.w3c_key(property);
        !NON_BSTACK_PROPERTIES.iter().any(|name| *name == key)
    }

    /// Options for `bstack:options`; `parent.child` keys become nested objects
    fn w3c_options(&self, properties: &BTreeMap<String, String>) -> Map<String, Value> {
        let mut options = Map::new();
        let mut nested: BTreeMap<String, Map<String, Value>> = BTreeMap::new();

        for (property, value) in properties.iter().filter(|(p, _)| self.is_w3c_property(p)) {
            let key = self.w3c_key(property);
            let mut parts = key.split('.').filter(|part| !part.is_empty());
            match (parts.next(), parts.next()) {
                (Some(parent), Some(child)) => {
                    nested
                        .entry(parent.to_string())
                        .or_default()
                        .insert(child.to_string(), Value::from(value.as_str()));
                }
                _ => {
                    options.insert(key.to_string(), Value::from(value.as_str()));
                }
            }
        }

        options.extend(nested.into_iter().map(|(parent, children)| (parent, Value::Object(children))));
        options
    }
}

impl BeforeAWebdriverScenario for BeforeABrowserStackScenario {
    fn apply(
        &self,
        environment: &EnvironmentVariables,
        driver: SupportedWebDriver,
        outcome: &TestOutcome,
        mut capabilities: DesiredCapabilities,
    ) -> Result<DesiredCapabilities, BrowserStackError> {
        if driver != SupportedWebDriver::Remote {
            return Ok(capabilities);
        }

        if let Some(platform) = environment
            .optional_property("remote.platform")
            .filter(|p| !p.is_empty())
        {
            capabilities.set_platform(platform.parse::<Platform>()?);
        }

        let properties = environment.properties_with_prefix(BROWSERSTACK_PREFIX);

        for (property, value) in properties.iter().filter(|(p, _)| !self.is_w3c_property(p)) {
            capabilities.set_capability(self.w3c_key(property), value.as_str());
        }

        let mut options = self.w3c_options(&properties);
        options.insert("sessionName".to_string(), Value::from(outcome.session_name()));

        debug!(
            session = %outcome.session_name(),
            options = options.len(),
            "Prepared BrowserStack capabilities"
        );
        capabilities.set_capability(BSTACK_OPTIONS, Value::Object(options));
        Ok(capabilities)
    }
}

fn unprefixed(property: &str) -> &str {
    property.strip_prefix(BROWSERSTACK_PREFIX).unwrap_or(property)
}
