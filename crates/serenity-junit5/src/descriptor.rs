use serde::{Deserialize, Serialize};
use serenity_core::MethodAnnotationLookup;
use std::collections::BTreeMap;

use crate::sources::SourceAnnotation;

/// Introspection over a test class.
///
/// The data-table extractor only needs the class name, its public methods and
/// the constants of the enums its sources refer to.
pub trait ClassIntrospection {
    /// Fully qualified name of the class (e.g. `com.acme.CalculatorTest`)
    fn canonical_name(&self) -> &str;

    /// The methods declared on the class, in declaration order
    fn methods(&self) -> &[MethodDescriptor];

    /// Constants of the named enum in declaration order, or `None` if the enum is unknown
    fn enum_constants(&self, enum_name: &str) -> Option<Vec<String>>;
}

/// A test class, as described in a YAML descriptor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestClassDescriptor {
    /// Canonical name of the class
    pub name: String,

    #[serde(default)]
    pub methods: Vec<MethodDescriptor>,

    /// Enum types referenced by enum sources: name -> constants
    #[serde(default)]
    pub enums: BTreeMap<String, Vec<String>>,
}

impl TestClassDescriptor {
    pub fn method(&self, name: &str) -> Option<&MethodDescriptor> {
        self.methods.iter().find(|m| m.name == name)
    }
}

impl ClassIntrospection for TestClassDescriptor {
    fn canonical_name(&self) -> &str {
        &self.name
    }

    fn methods(&self) -> &[MethodDescriptor] {
        &self.methods
    }

    /// Exact name first, then a unique match on the simple name
    fn enum_constants(&self, enum_name: &str) -> Option<Vec<String>> {
        if let Some(constants) = self.enums.get(enum_name) {
            return Some(constants.clone());
        }

        let wanted = simple_name(enum_name);
        let mut candidates = self
            .enums
            .iter()
            .filter(|(name, _)| simple_name(name) == wanted);
        match (candidates.next(), candidates.next()) {
            (Some((_, constants)), None) => Some(constants.clone()),
            _ => None,
        }
    }
}

/// A method of a test class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodDescriptor {
    pub name: String,

    /// Parameter names in declaration order
    #[serde(default)]
    pub parameters: Vec<String>,

    #[serde(default)]
    pub annotations: Vec<AnnotationDescriptor>,

    /// Only public methods are visible to the test runner
    #[serde(default = "default_true")]
    pub public: bool,
}

fn default_true() -> bool {
    true
}

impl MethodDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: Vec::new(),
            annotations: Vec::new(),
            public: true,
        }
    }

    pub fn with_parameters<I, S>(mut self, parameters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parameters = parameters.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_annotation(mut self, annotation: AnnotationDescriptor) -> Self {
        self.annotations.push(annotation);
        self
    }

    /// The first annotation with the given (simple or qualified) name
    pub fn annotation(&self, name: &str) -> Option<&AnnotationDescriptor> {
        self.annotations.iter().find(|a| a.is(name))
    }

    pub fn is_annotated_with(&self, name: &str) -> bool {
        self.annotation(name).is_some()
    }

    /// Decode the attributes of a source annotation, if the method carries it
    pub fn source<T: SourceAnnotation>(&self) -> Option<Result<T, serde_json::Error>> {
        self.annotation(T::NAME).map(AnnotationDescriptor::attributes_as)
    }
}

/// An annotation: its name and free-form attributes.
///
/// In YAML an annotation without attributes may be written as a plain string:
///
/// ```yaml
/// annotations:
///   - ParameterizedTest
///   - name: ValueSource
///     ints: [1, 2, 3]
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "AnnotationRepr")]
pub struct AnnotationDescriptor {
    pub name: String,

    #[serde(flatten)]
    pub attributes: serde_json::Map<String, serde_json::Value>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AnnotationRepr {
    Marker(String),
    Full {
        name: String,
        #[serde(flatten)]
        attributes: serde_json::Map<String, serde_json::Value>,
    },
}

impl From<AnnotationRepr> for AnnotationDescriptor {
    fn from(repr: AnnotationRepr) -> Self {
        match repr {
            AnnotationRepr::Marker(name) => AnnotationDescriptor::marker(name),
            AnnotationRepr::Full { name, attributes } => AnnotationDescriptor { name, attributes },
        }
    }
}

impl AnnotationDescriptor {
    /// An annotation without attributes
    pub fn marker(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: serde_json::Map::new(),
        }
    }

    /// An annotation with attributes taken from a JSON object.
    ///
    /// Anything other than an object leaves the attributes empty.
    pub fn with_attributes(name: impl Into<String>, attributes: serde_json::Value) -> Self {
        let attributes = match attributes {
            serde_json::Value::Object(map) => map,
            _ => serde_json::Map::new(),
        };
        Self {
            name: name.into(),
            attributes,
        }
    }

    pub fn simple_name(&self) -> &str {
        simple_name(&self.name)
    }

    /// Compare by simple name, so qualified and unqualified names are equivalent
    pub fn is(&self, name: &str) -> bool {
        self.simple_name() == simple_name(name)
    }

    pub fn attributes_as<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(serde_json::Value::Object(self.attributes.clone()))
    }
}

/// The test classes of a run, addressable by canonical name
#[derive(Debug, Clone, Default)]
pub struct TestClassCatalog {
    classes: BTreeMap<String, TestClassDescriptor>,
}

impl TestClassCatalog {
    pub fn new(classes: impl IntoIterator<Item = TestClassDescriptor>) -> Self {
        Self {
            classes: classes.into_iter().map(|c| (c.name.clone(), c)).collect(),
        }
    }

    pub fn get(&self, class_name: &str) -> Option<&TestClassDescriptor> {
        self.classes.get(class_name)
    }
}

impl MethodAnnotationLookup for TestClassCatalog {
    fn annotations_of(&self, class_name: &str, method_name: &str) -> Option<Vec<String>> {
        let method = self.get(class_name)?.method(method_name)?;
        Some(method.annotations.iter().map(|a| a.name.clone()).collect())
    }
}

fn simple_name(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::ValueSource;
    use serde_json::json;

    fn colour_class() -> TestClassDescriptor {
        TestClassDescriptor {
            name: "com.acme.PaletteTest".to_string(),
            methods: vec![MethodDescriptor::new("paints")
                .with_parameters(["colour"])
                .with_annotation(AnnotationDescriptor::marker(
                    "org.junit.jupiter.params.ParameterizedTest",
                ))
                .with_annotation(AnnotationDescriptor::with_attributes(
                    "ValueSource",
                    json!({"strings": ["red", "green"]}),
                ))],
            enums: BTreeMap::from([
                ("com.acme.Colour".to_string(), vec!["RED".to_string(), "GREEN".to_string()]),
                ("com.acme.Size".to_string(), vec!["S".to_string()]),
                ("org.other.Size".to_string(), vec!["XL".to_string()]),
            ]),
        }
    }

    #[test]
    fn test_annotation_lookup_by_simple_name() {
        let class = colour_class();
        let method = class.method("paints").unwrap();

        assert!(method.is_annotated_with("ParameterizedTest"));
        assert!(method.is_annotated_with("org.junit.jupiter.params.provider.ValueSource"));
        assert!(!method.is_annotated_with("CsvSource"));
    }

    #[test]
    fn test_typed_source_attributes() {
        let class = colour_class();
        let source = class.method("paints").unwrap().source::<ValueSource>().unwrap().unwrap();
        assert_eq!(source.strings, vec!["red", "green"]);
        assert!(source.ints.is_empty());
    }

    #[test]
    fn test_malformed_source_attributes() {
        let method = MethodDescriptor::new("broken").with_annotation(
            AnnotationDescriptor::with_attributes("ValueSource", json!({"ints": ["one"]})),
        );
        assert!(method.source::<ValueSource>().unwrap().is_err());
    }

    #[test]
    fn test_enum_constants_resolution() {
        let class = colour_class();
        assert_eq!(
            class.enum_constants("com.acme.Colour"),
            Some(vec!["RED".to_string(), "GREEN".to_string()])
        );
        assert_eq!(
            class.enum_constants("Colour"),
            Some(vec!["RED".to_string(), "GREEN".to_string()])
        );
        // ambiguous simple name
        assert_eq!(class.enum_constants("Size"), None);
        assert_eq!(class.enum_constants("com.acme.Size"), Some(vec!["S".to_string()]));
        assert_eq!(class.enum_constants("Shape"), None);
    }

    #[test]
    fn test_annotation_yaml_forms() {
        let annotations: Vec<AnnotationDescriptor> = serde_yaml::from_str(
            r#"
            - ParameterizedTest
            - name: CsvSource
              value: ["1,2"]
              delimiterString: ";"
            "#,
        )
        .unwrap();

        assert_eq!(annotations[0], AnnotationDescriptor::marker("ParameterizedTest"));
        assert_eq!(annotations[1].name, "CsvSource");
        assert_eq!(annotations[1].attributes["delimiterString"], json!(";"));
        assert_eq!(annotations[1].attributes["value"], json!(["1,2"]));
    }

    #[test]
    fn test_catalog_lookup() {
        let catalog = TestClassCatalog::new([colour_class()]);
        assert_eq!(
            catalog.annotations_of("com.acme.PaletteTest", "paints"),
            Some(vec![
                "org.junit.jupiter.params.ParameterizedTest".to_string(),
                "ValueSource".to_string()
            ])
        );
        assert_eq!(catalog.annotations_of("com.acme.PaletteTest", "other"), None);
        assert_eq!(catalog.annotations_of("com.acme.Missing", "paints"), None);
    }
}
