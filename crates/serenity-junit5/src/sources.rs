//! Data-source annotations of parameterized tests.
//!
//! Each source annotation is decoded from the free-form attributes of an
//! [`AnnotationDescriptor`](crate::AnnotationDescriptor) into one of the typed
//! structs below. A method's source is classified once into a [`SourceKind`].

use regex::Regex;
use serde::de::{self, DeserializeOwned};
use serde::{Deserialize, Deserializer, Serialize};
use serenity_model::ParameterValue;
use tracing::{debug, warn};

use crate::descriptor::MethodDescriptor;

/// Marks a method as a parameterized test
pub const PARAMETERIZED_TEST: &str = "ParameterizedTest";

/// A data-source annotation with typed attributes
pub trait SourceAnnotation: DeserializeOwned {
    /// Simple name of the annotation
    const NAME: &'static str;
}

/// Literal values, one test invocation per element.
///
/// Only one of the arrays is expected to be populated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValueSource {
    #[serde(deserialize_with = "lenient_strings")]
    pub strings: Vec<String>,
    pub bytes: Vec<i8>,
    pub chars: Vec<char>,
    pub doubles: Vec<f64>,
    /// Kept at double precision so literals such as `0.1` are not widened from `f32`
    pub floats: Vec<f64>,
    pub ints: Vec<i32>,
    pub shorts: Vec<i16>,
    #[serde(deserialize_with = "lenient_strings")]
    pub classes: Vec<String>,
    pub longs: Vec<i64>,
    pub booleans: Vec<bool>,
}

impl SourceAnnotation for ValueSource {
    const NAME: &'static str = "ValueSource";
}

impl ValueSource {
    /// The values of the first populated array, or nothing at all
    pub fn values(&self) -> Vec<ParameterValue> {
        if !self.strings.is_empty() {
            to_values(&self.strings)
        } else if !self.bytes.is_empty() {
            to_values(&self.bytes)
        } else if !self.chars.is_empty() {
            to_values(&self.chars)
        } else if !self.doubles.is_empty() {
            to_values(&self.doubles)
        } else if !self.floats.is_empty() {
            to_values(&self.floats)
        } else if !self.ints.is_empty() {
            to_values(&self.ints)
        } else if !self.shorts.is_empty() {
            to_values(&self.shorts)
        } else if !self.classes.is_empty() {
            self.classes.iter().cloned().map(ParameterValue::Class).collect()
        } else if !self.longs.is_empty() {
            to_values(&self.longs)
        } else if !self.booleans.is_empty() {
            to_values(&self.booleans)
        } else {
            Vec::new()
        }
    }
}

fn to_values<T: Clone + Into<ParameterValue>>(values: &[T]) -> Vec<ParameterValue> {
    values.iter().cloned().map(Into::into).collect()
}

/// Strings that YAML may have read as numbers or booleans (`[1, true]`)
fn lenient_strings<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Vec::<serde_json::Value>::deserialize(deserializer)?
        .into_iter()
        .map(|value| match value {
            serde_json::Value::String(s) => Ok(s),
            serde_json::Value::Number(n) => Ok(n.to_string()),
            serde_json::Value::Bool(b) => Ok(b.to_string()),
            serde_json::Value::Null => Ok(String::new()),
            other => Err(<D::Error as de::Error>::custom(format!(
                "expected a string, found {}",
                other
            ))),
        })
        .collect()
}

/// Inline CSV lines, one test invocation per line.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CsvSource {
    #[serde(deserialize_with = "lenient_strings")]
    pub value: Vec<String>,
    pub delimiter: Option<char>,
    #[serde(alias = "delimiterString")]
    pub delimiter_string: String,
}

impl SourceAnnotation for CsvSource {
    const NAME: &'static str = "CsvSource";
}

impl CsvSource {
    /// `delimiter_string` if set, then `delimiter`, then a comma
    pub fn effective_delimiter(&self) -> String {
        if !self.delimiter_string.is_empty() {
            self.delimiter_string.clone()
        } else if let Some(delimiter) = self.delimiter {
            delimiter.to_string()
        } else {
            ",".to_string()
        }
    }

    /// Split every line into one row of text cells
    pub fn rows(&self) -> Vec<Vec<ParameterValue>> {
        let delimiter = self.effective_delimiter();
        self.value
            .iter()
            .map(|line| {
                split_line(line, &delimiter)
                    .into_iter()
                    .map(ParameterValue::from)
                    .collect()
            })
            .collect()
    }
}

/// Literal split that drops trailing empty parts.
///
/// A line without the delimiter is a single part, even when empty.
fn split_line<'a>(line: &'a str, delimiter: &str) -> Vec<&'a str> {
    if !line.contains(delimiter) {
        return vec![line];
    }
    let mut parts: Vec<&str> = line.split(delimiter).collect();
    while parts.last().is_some_and(|part| part.is_empty()) {
        parts.pop();
    }
    parts
}

/// CSV files with a header row, one test invocation per record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CsvFileSource {
    /// Resource names, relative to the resource root
    pub resources: Vec<String>,
    /// File-system paths
    pub files: Vec<String>,
    pub delimiter: Option<char>,
}

impl SourceAnnotation for CsvFileSource {
    const NAME: &'static str = "CsvFileSource";
}

/// How `names` of an [`EnumSource`] select constants
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EnumMode {
    /// Keep exactly the named constants
    #[default]
    Include,
    /// Keep every constant except the named ones
    Exclude,
    /// Keep constants matching every pattern in `names`
    MatchAll,
    /// Keep constants matching at least one pattern in `names`
    MatchAny,
}

/// Constants of an enum type, one test invocation per constant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumSource {
    /// Name of the enum type; empty when the annotation leaves it out
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub names: Vec<String>,
    #[serde(default)]
    pub mode: EnumMode,
}

impl SourceAnnotation for EnumSource {
    const NAME: &'static str = "EnumSource";
}

impl EnumSource {
    /// Apply `names` and `mode` to the constants, keeping declaration order
    pub fn select(&self, constants: &[String]) -> Result<Vec<String>, regex::Error> {
        if self.names.is_empty() {
            return Ok(constants.to_vec());
        }

        let selected = match self.mode {
            EnumMode::Include => {
                for name in self.names.iter().filter(|name| !constants.contains(name)) {
                    warn!(enum_type = %self.value, constant = %name, "Unknown enum constant in EnumSource names");
                }
                constants
                    .iter()
                    .filter(|constant| self.names.contains(constant))
                    .cloned()
                    .collect()
            }
            EnumMode::Exclude => constants
                .iter()
                .filter(|constant| !self.names.contains(constant))
                .cloned()
                .collect(),
            EnumMode::MatchAll => {
                let patterns = self.patterns()?;
                constants
                    .iter()
                    .filter(|constant| patterns.iter().all(|p| p.is_match(constant)))
                    .cloned()
                    .collect()
            }
            EnumMode::MatchAny => {
                let patterns = self.patterns()?;
                constants
                    .iter()
                    .filter(|constant| patterns.iter().any(|p| p.is_match(constant)))
                    .cloned()
                    .collect()
            }
        };
        Ok(selected)
    }

    /// `names` compiled as whole-string patterns
    fn patterns(&self) -> Result<Vec<Regex>, regex::Error> {
        self.names
            .iter()
            .map(|name| Regex::new(&format!("^(?:{})$", name)))
            .collect()
    }
}

/// The data source of an eligible parameterized test
#[derive(Debug, Clone, PartialEq)]
pub enum SourceKind {
    Value(ValueSource),
    CsvFile(CsvFileSource),
    CsvInline(CsvSource),
    Enum(EnumSource),
}

impl SourceKind {
    /// Classify a method.
    ///
    /// Returns `None` unless the method is a parameterized test carrying
    /// exactly one recognised source annotation whose attributes decode.
    pub fn of(method: &MethodDescriptor) -> Option<SourceKind> {
        if !method.is_annotated_with(PARAMETERIZED_TEST) {
            return None;
        }

        let sources: Vec<&str> = [
            ValueSource::NAME,
            CsvFileSource::NAME,
            CsvSource::NAME,
            EnumSource::NAME,
        ]
        .into_iter()
        .filter(|name| method.is_annotated_with(name))
        .collect();

        match sources.as_slice() {
            [] => {
                debug!(method = %method.name, "Parameterized test without a recognised data source");
                None
            }
            [source] => Self::decode(method, source),
            several => {
                debug!(method = %method.name, sources = ?several, "Parameterized test with several data sources");
                None
            }
        }
    }

    fn decode(method: &MethodDescriptor, source: &str) -> Option<SourceKind> {
        let decoded = match source {
            ValueSource::NAME => method.source::<ValueSource>().map(|r| r.map(SourceKind::Value)),
            CsvFileSource::NAME => method.source::<CsvFileSource>().map(|r| r.map(SourceKind::CsvFile)),
            CsvSource::NAME => method.source::<CsvSource>().map(|r| r.map(SourceKind::CsvInline)),
            EnumSource::NAME => method.source::<EnumSource>().map(|r| r.map(SourceKind::Enum)),
            _ => None,
        }?;

        match decoded {
            Ok(kind) => Some(kind),
            Err(e) => {
                warn!(method = %method.name, source, error = %e, "Cannot read data source attributes");
                None
            }
        }
    }

    /// Simple name of the underlying annotation
    pub fn name(&self) -> &'static str {
        match self {
            SourceKind::Value(_) => ValueSource::NAME,
            SourceKind::CsvFile(_) => CsvFileSource::NAME,
            SourceKind::CsvInline(_) => CsvSource::NAME,
            SourceKind::Enum(_) => EnumSource::NAME,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn constants(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    fn enum_source(names: &[&str], mode: EnumMode) -> EnumSource {
        EnumSource {
            value: "Colour".to_string(),
            names: constants(names),
            mode,
        }
    }

    #[test]
    fn test_value_source_prefers_first_populated_array() {
        let source = ValueSource {
            ints: vec![1, 2],
            classes: vec!["java.lang.String".to_string()],
            ..Default::default()
        };
        assert_eq!(source.values(), vec![ParameterValue::Int(1), ParameterValue::Int(2)]);
    }

    #[test]
    fn test_value_source_kinds() {
        let chars = ValueSource {
            chars: vec!['a', 'b'],
            ..Default::default()
        };
        assert_eq!(chars.values(), vec![ParameterValue::Char('a'), ParameterValue::Char('b')]);

        let classes = ValueSource {
            classes: vec!["java.util.List".to_string()],
            ..Default::default()
        };
        assert_eq!(classes.values(), vec![ParameterValue::Class("java.util.List".to_string())]);

        let booleans = ValueSource {
            booleans: vec![true],
            ..Default::default()
        };
        assert_eq!(booleans.values(), vec![ParameterValue::Bool(true)]);

        assert!(ValueSource::default().values().is_empty());
    }

    #[test]
    fn test_csv_source_delimiters() {
        let mut source = CsvSource {
            value: vec!["a|b".to_string()],
            ..Default::default()
        };
        assert_eq!(source.effective_delimiter(), ",");

        source.delimiter = Some('|');
        assert_eq!(source.effective_delimiter(), "|");
        assert_eq!(source.rows(), vec![vec![ParameterValue::from("a"), ParameterValue::from("b")]]);

        source.delimiter_string = "||".to_string();
        assert_eq!(source.effective_delimiter(), "||");
    }

    #[test]
    fn test_split_line() {
        assert_eq!(split_line("1,2,3", ","), vec!["1", "2", "3"]);
        assert_eq!(split_line("a,,b", ","), vec!["a", "", "b"]);
        assert_eq!(split_line("a,b,,", ","), vec!["a", "b"]);
        assert_eq!(split_line("a.b", "."), vec!["a", "b"]);
        assert_eq!(split_line("single", ","), vec!["single"]);
        assert_eq!(split_line("", ","), vec![""]);
        assert!(split_line(",,", ",").is_empty());
    }

    #[test]
    fn test_enum_include_and_exclude() {
        let all = constants(&["A", "B", "C"]);

        let include = enum_source(&["B", "A"], EnumMode::Include);
        assert_eq!(include.select(&all).unwrap(), constants(&["A", "B"]));

        let exclude = enum_source(&["A", "B"], EnumMode::Exclude);
        assert_eq!(exclude.select(&all).unwrap(), constants(&["C"]));

        let unknown = enum_source(&["A", "Z"], EnumMode::Include);
        assert_eq!(unknown.select(&all).unwrap(), constants(&["A"]));

        let everything = enum_source(&[], EnumMode::Exclude);
        assert_eq!(everything.select(&all).unwrap(), all);
    }

    #[test]
    fn test_enum_match_modes() {
        let all = constants(&["DARK_RED", "LIGHT_RED", "DARK_BLUE"]);

        let match_all = enum_source(&["DARK_.*", ".*RED"], EnumMode::MatchAll);
        assert_eq!(match_all.select(&all).unwrap(), constants(&["DARK_RED"]));

        let match_any = enum_source(&["LIGHT_.*", ".*BLUE"], EnumMode::MatchAny);
        assert_eq!(match_any.select(&all).unwrap(), constants(&["LIGHT_RED", "DARK_BLUE"]));

        // patterns must match the whole name
        let partial = enum_source(&["RED"], EnumMode::MatchAny);
        assert!(partial.select(&all).unwrap().is_empty());

        let invalid = enum_source(&["(unclosed"], EnumMode::MatchAll);
        assert!(invalid.select(&all).is_err());
    }

    #[test]
    fn test_value_source_floats_and_doubles() {
        let floats: ValueSource = serde_json::from_value(serde_json::json!({"floats": [0.1, 2.0]})).unwrap();
        let rendered: Vec<String> = floats.values().iter().map(ToString::to_string).collect();
        assert_eq!(rendered, vec!["0.1", "2.0"]);

        let doubles = ValueSource {
            doubles: vec![2.0, 0.25],
            ..Default::default()
        };
        assert_eq!(doubles.values(), vec![ParameterValue::Float(2.0), ParameterValue::Float(0.25)]);
        assert_eq!(doubles.values()[0].to_string(), "2.0");
    }

    #[test]
    fn test_unquoted_yaml_scalars_are_strings() {
        let source: ValueSource = serde_yaml::from_str("strings: [1, true, 2.5, text]").unwrap();
        assert_eq!(source.strings, vec!["1", "true", "2.5", "text"]);

        let classes: ValueSource = serde_json::from_value(serde_json::json!({"classes": [42]})).unwrap();
        assert_eq!(classes.classes, vec!["42"]);

        let csv: CsvSource = serde_yaml::from_str("value: [1, 'a,b']").unwrap();
        assert_eq!(csv.value, vec!["1", "a,b"]);

        let nested = serde_json::from_value::<ValueSource>(serde_json::json!({"strings": [[1]]}));
        assert!(nested.is_err());
    }

    #[test]
    fn test_enum_source_without_value() {
        let source: EnumSource = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(source.value.is_empty());
        assert_eq!(source.mode, EnumMode::Include);
    }

    #[test]
    fn test_enum_mode_deserializes_from_junit_names() {
        let source: EnumSource =
            serde_json::from_value(serde_json::json!({"value": "Colour", "mode": "MATCH_ANY"})).unwrap();
        assert_eq!(source.mode, EnumMode::MatchAny);
        assert!(source.names.is_empty());
    }
}
