use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use crate::error::BrowserStackError;

/// Drivers a scenario can run with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupportedWebDriver {
    Chrome,
    Firefox,
    Edge,
    Safari,
    Remote,
    Appium,
}

/// Operating systems understood by remote WebDriver grids.
///
/// Names match Selenium's platform constants (`WIN10`, `MAC`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Platform {
    Windows,
    Xp,
    Vista,
    Win7,
    Win8,
    #[serde(rename = "WIN8_1")]
    Win8_1,
    Win10,
    Win11,
    Mac,
    Unix,
    Linux,
    Android,
    Ios,
    Any,
}

impl Platform {
    pub fn name(&self) -> &'static str {
        match self {
            Platform::Windows => "WINDOWS",
            Platform::Xp => "XP",
            Platform::Vista => "VISTA",
            Platform::Win7 => "WIN7",
            Platform::Win8 => "WIN8",
            Platform::Win8_1 => "WIN8_1",
            Platform::Win10 => "WIN10",
            Platform::Win11 => "WIN11",
            Platform::Mac => "MAC",
            Platform::Unix => "UNIX",
            Platform::Linux => "LINUX",
            Platform::Android => "ANDROID",
            Platform::Ios => "IOS",
            Platform::Any => "ANY",
        }
    }
}

impl FromStr for Platform {
    type Err = BrowserStackError;

    /// Exact, case-sensitive constant names
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "WINDOWS" => Ok(Platform::Windows),
            "XP" => Ok(Platform::Xp),
            "VISTA" => Ok(Platform::Vista),
            "WIN7" => Ok(Platform::Win7),
            "WIN8" => Ok(Platform::Win8),
            "WIN8_1" => Ok(Platform::Win8_1),
            "WIN10" => Ok(Platform::Win10),
            "WIN11" => Ok(Platform::Win11),
            "MAC" => Ok(Platform::Mac),
            "UNIX" => Ok(Platform::Unix),
            "LINUX" => Ok(Platform::Linux),
            "ANDROID" => Ok(Platform::Android),
            "IOS" => Ok(Platform::Ios),
            "ANY" => Ok(Platform::Any),
            other => Err(BrowserStackError::UnknownPlatform(other.to_string())),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Capabilities requested from a WebDriver session
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DesiredCapabilities {
    #[serde(skip_serializing_if = "Option::is_none")]
    platform: Option<Platform>,
    #[serde(flatten)]
    capabilities: Map<String, Value>,
}

impl DesiredCapabilities {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn platform(&self) -> Option<Platform> {
        self.platform
    }

    pub fn set_platform(&mut self, platform: Platform) {
        self.platform = Some(platform);
    }

    /// Set a capability, replacing any earlier value
    pub fn set_capability(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.capabilities.insert(name.into(), value.into());
    }

    pub fn capability(&self, name: &str) -> Option<&Value> {
        self.capabilities.get(name)
    }

    pub fn capabilities(&self) -> &Map<String, Value> {
        &self.capabilities
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_platform_names() {
        assert_eq!("WIN10".parse::<Platform>(), Ok(Platform::Win10));
        assert_eq!("WIN8_1".parse::<Platform>().unwrap().to_string(), "WIN8_1");
        assert_eq!(
            "win10".parse::<Platform>(),
            Err(BrowserStackError::UnknownPlatform("win10".to_string()))
        );
    }

    #[test]
    fn test_capabilities_serialize_flat() {
        let mut capabilities = DesiredCapabilities::new();
        capabilities.set_platform(Platform::Mac);
        capabilities.set_capability("browserName", "safari");

        assert_eq!(
            serde_json::to_value(&capabilities).unwrap(),
            json!({"platform": "MAC", "browserName": "safari"})
        );
    }
}
