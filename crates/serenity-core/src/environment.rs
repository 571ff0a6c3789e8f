//! Property store for test-run configuration.

use serde_yaml::Value;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

use crate::error::{CoreError, CoreResult};

const ENVIRONMENT: &str = "environment";
const ENVIRONMENTS_PREFIX: &str = "environments";

/// String properties a test run is configured from.
///
/// Properties come from the process environment, from a YAML configuration
/// file (nested keys are flattened to dotted names), or are set directly.
///
/// ```
/// use serenity_core::EnvironmentVariables;
///
/// let env = EnvironmentVariables::from_yaml(r#"
/// environment: staging
/// webdriver:
///   base.url: http://localhost
/// environments:
///   staging:
///     webdriver.base.url: https://staging.example.com
/// "#).unwrap();
///
/// assert_eq!(env.property("webdriver.base.url"), Some("http://localhost"));
/// assert_eq!(
///     env.optional_property("webdriver.base.url"),
///     Some("https://staging.example.com")
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvironmentVariables {
    properties: BTreeMap<String, String>,
}

impl EnvironmentVariables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the current process environment
    pub fn from_system() -> Self {
        Self {
            properties: std::env::vars().collect(),
        }
    }

    /// Parse a YAML document, flattening nested mappings to dotted keys
    pub fn from_yaml(yaml: &str) -> CoreResult<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let document: Value = serde_yaml::from_str(yaml)?;
        let mut properties = BTreeMap::new();
        match &document {
            Value::Null => {}
            Value::Mapping(_) => flatten_into(&mut properties, None, &document),
            other => {
                return Err(CoreError::Config(format!(
                    "expected a mapping at the top level of the configuration, found {}",
                    type_name(other)
                )))
            }
        }
        Ok(Self { properties })
    }

    /// Load properties from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> CoreResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| CoreError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let env = Self::from_yaml(&content)?;
        debug!(path = %path.display(), properties = env.len(), "Loaded environment properties");
        Ok(env)
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Combine two property sets; `overrides` wins on conflicting keys
    pub fn merged_with(mut self, overrides: EnvironmentVariables) -> Self {
        self.properties.extend(overrides.properties);
        self
    }

    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    pub fn property_or(&self, key: &str, default: &str) -> String {
        self.property(key).unwrap_or(default).to_string()
    }

    /// All properties whose key starts with `prefix`, keys unchanged
    pub fn properties_with_prefix(&self, prefix: &str) -> BTreeMap<String, String> {
        self.properties
            .range(prefix.to_string()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    /// Look a property up with environment-specific overrides applied.
    ///
    /// When `environment` is set to `<env>`, `environments.<env>.<key>` is
    /// consulted first; otherwise `environments.default.<key>`. Then
    /// `environments.all.<key>`, then the plain `<key>`.
    pub fn optional_property(&self, key: &str) -> Option<&str> {
        let selected = self.property(ENVIRONMENT).unwrap_or("default");

        self.property(&format!("{}.{}.{}", ENVIRONMENTS_PREFIX, selected, key))
            .or_else(|| self.property(&format!("{}.all.{}", ENVIRONMENTS_PREFIX, key)))
            .or_else(|| self.property(key))
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

fn flatten_into(properties: &mut BTreeMap<String, String>, prefix: Option<&str>, value: &Value) {
    match value {
        Value::Mapping(mapping) => {
            for (key, child) in mapping {
                let Some(key) = scalar_to_string(key) else {
                    continue;
                };
                let full_key = match prefix {
                    Some(prefix) => format!("{}.{}", prefix, key),
                    None => key,
                };
                flatten_into(properties, Some(&full_key), child);
            }
        }
        Value::Sequence(items) => {
            if let Some(prefix) = prefix {
                let joined = items
                    .iter()
                    .filter_map(scalar_to_string)
                    .collect::<Vec<_>>()
                    .join(",");
                properties.insert(prefix.to_string(), joined);
            }
        }
        Value::Tagged(tagged) => flatten_into(properties, prefix, &tagged.value),
        scalar => {
            if let (Some(prefix), Some(text)) = (prefix, scalar_to_string(scalar)) {
                properties.insert(prefix.to_string(), text);
            }
        }
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => Some(String::new()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.clone()),
        Value::Tagged(tagged) => scalar_to_string(&tagged.value),
        Value::Sequence(_) | Value::Mapping(_) => None,
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_flattens_nested_yaml() {
        let env = EnvironmentVariables::from_yaml(
            r#"
            serenity:
              project.name: Demo
              take:
                screenshots: FOR_FAILURES
            browserstack:
              os_version: "11"
              local: true
            tags: [smoke, regression]
            "#,
        )
        .unwrap();

        assert_eq!(env.property("serenity.project.name"), Some("Demo"));
        assert_eq!(env.property("serenity.take.screenshots"), Some("FOR_FAILURES"));
        assert_eq!(env.property("browserstack.os_version"), Some("11"));
        assert_eq!(env.property("browserstack.local"), Some("true"));
        assert_eq!(env.property("tags"), Some("smoke,regression"));
    }

    #[test]
    fn test_empty_document() {
        let env = EnvironmentVariables::from_yaml("").unwrap();
        assert!(env.is_empty());
    }

    #[test]
    fn test_rejects_non_mapping_document() {
        let err = EnvironmentVariables::from_yaml("- just\n- a list\n").unwrap_err();
        assert_eq!(err.error_code(), "ERR_CORE_CONFIG");
    }

    #[test]
    fn test_properties_with_prefix() {
        let env = EnvironmentVariables::new()
            .with_property("browserstack.user", "me")
            .with_property("browserstack.key", "secret")
            .with_property("browser", "chrome")
            .with_property("webdriver.driver", "remote");

        let props = env.properties_with_prefix("browserstack.");
        assert_eq!(props.len(), 2);
        assert_eq!(props["browserstack.user"], "me");
        assert_eq!(props["browserstack.key"], "secret");
    }

    #[test]
    fn test_environment_specific_lookup() {
        let env = EnvironmentVariables::new()
            .with_property("remote.platform", "LINUX")
            .with_property("environments.all.remote.platform", "MAC")
            .with_property("environments.ci.remote.platform", "WINDOWS")
            .with_property("environments.default.webdriver.driver", "chrome");

        // without an environment, default then all win over the plain key
        assert_eq!(env.optional_property("remote.platform"), Some("MAC"));
        assert_eq!(env.optional_property("webdriver.driver"), Some("chrome"));

        let ci = env.clone().with_property("environment", "ci");
        assert_eq!(ci.optional_property("remote.platform"), Some("WINDOWS"));
        assert_eq!(ci.optional_property("webdriver.driver"), None);
        assert_eq!(ci.optional_property("missing"), None);
    }

    #[test]
    fn test_merged_with_overrides() {
        let base = EnvironmentVariables::new()
            .with_property("a", "1")
            .with_property("b", "2");
        let merged = base.merged_with(EnvironmentVariables::new().with_property("b", "3"));
        assert_eq!(merged.property("a"), Some("1"));
        assert_eq!(merged.property("b"), Some("3"));
        assert_eq!(merged.property_or("c", "4"), "4");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "serenity:\n  data.dir: fixtures").unwrap();

        let env = EnvironmentVariables::load(file.path()).unwrap();
        assert_eq!(env.property("serenity.data.dir"), Some("fixtures"));
    }

    #[test]
    fn test_load_missing_file() {
        let err = EnvironmentVariables::load("/definitely/not/here.yml").unwrap_err();
        assert_eq!(err.error_code(), "ERR_CORE_IO");
        assert!(err.to_string().contains("/definitely/not/here.yml"));
    }
}
