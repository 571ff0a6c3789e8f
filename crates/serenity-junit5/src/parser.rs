use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::descriptor::TestClassDescriptor;
use crate::error::DescriptorError;

/// A descriptor file holds either one class or a `classes:` list
#[derive(Deserialize)]
#[serde(untagged)]
enum DescriptorDocument {
    Many { classes: Vec<TestClassDescriptor> },
    One(TestClassDescriptor),
}

/// Parse a YAML string describing a single test class.
///
/// # Arguments
///
/// * `yaml_str` - A YAML mapping with the class `name`, its `methods` and `enums`
///
/// # Returns
///
/// A `Result` containing either the `TestClassDescriptor` or a `DescriptorError`
pub fn parse_test_class(yaml_str: &str) -> Result<TestClassDescriptor, DescriptorError> {
    let test_class: TestClassDescriptor = serde_yaml::from_str(yaml_str)?;
    validate(&test_class)?;
    Ok(test_class)
}

/// Parse a YAML string holding one class or a `classes:` list.
pub fn parse_test_classes(yaml_str: &str) -> Result<Vec<TestClassDescriptor>, DescriptorError> {
    let document: DescriptorDocument = serde_yaml::from_str(yaml_str)?;
    let test_classes = match document {
        DescriptorDocument::Many { classes } => classes,
        DescriptorDocument::One(test_class) => vec![test_class],
    };

    for test_class in &test_classes {
        validate(test_class)?;
    }
    Ok(test_classes)
}

pub fn load_test_class<P: AsRef<Path>>(path: P) -> Result<TestClassDescriptor, DescriptorError> {
    parse_test_class(&read_descriptor(path.as_ref())?)
}

pub fn load_test_classes<P: AsRef<Path>>(
    path: P,
) -> Result<Vec<TestClassDescriptor>, DescriptorError> {
    parse_test_classes(&read_descriptor(path.as_ref())?)
}

fn read_descriptor(path: &Path) -> Result<String, DescriptorError> {
    fs::read_to_string(path).map_err(|source| DescriptorError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn validate(test_class: &TestClassDescriptor) -> Result<(), DescriptorError> {
    if test_class.name.trim().is_empty() {
        return Err(DescriptorError::MissingRequiredField("name".to_string()));
    }
    for (index, method) in test_class.methods.iter().enumerate() {
        if method.name.trim().is_empty() {
            return Err(DescriptorError::MissingRequiredField(format!(
                "{}.methods[{}].name",
                test_class.name, index
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_minimal_class() {
        let yaml = r#"
        name: com.acme.EmptyTest
        "#;

        let result = parse_test_class(yaml);
        assert!(result.is_ok(), "Failed to parse valid class: {:?}", result.err());

        let test_class = result.unwrap();
        assert_eq!(test_class.name, "com.acme.EmptyTest");
        assert!(test_class.methods.is_empty());
        assert!(test_class.enums.is_empty());
    }

    #[test]
    fn test_method_defaults() {
        let yaml = r#"
        name: com.acme.SampleTest
        methods:
          - name: runs
          - name: hidden
            public: false
        "#;

        let test_class = parse_test_class(yaml).unwrap();
        assert!(test_class.methods[0].public);
        assert!(test_class.methods[0].parameters.is_empty());
        assert!(!test_class.methods[1].public);
    }

    #[test]
    fn test_invalid_yaml_syntax() {
        let yaml = r#"
        name: com.acme.BrokenTest
        methods: [
          - name: broken
        "#;

        match parse_test_class(yaml).err().unwrap() {
            DescriptorError::YamlError(_) => {}
            err => panic!("Expected YamlError, got {:?}", err),
        }
    }

    #[test]
    fn test_missing_method_name() {
        let yaml = r#"
        name: com.acme.SampleTest
        methods:
          - name: ""
        "#;

        match parse_test_class(yaml).err().unwrap() {
            DescriptorError::MissingRequiredField(field) => {
                assert_eq!(field, "com.acme.SampleTest.methods[0].name");
            }
            err => panic!("Expected MissingRequiredField, got {:?}", err),
        }
    }

    #[test]
    fn test_parse_class_list() {
        let yaml = r#"
        classes:
          - name: com.acme.FirstTest
          - name: com.acme.SecondTest
            methods:
              - name: runs
        "#;

        let test_classes = parse_test_classes(yaml).unwrap();
        assert_eq!(test_classes.len(), 2);
        assert_eq!(test_classes[1].methods[0].name, "runs");

        let single = parse_test_classes("name: com.acme.OnlyTest").unwrap();
        assert_eq!(single.len(), 1);
        assert_eq!(single[0].name, "com.acme.OnlyTest");
    }

    #[test]
    fn test_class_list_is_validated() {
        let yaml = r#"
        classes:
          - name: " "
        "#;
        let err = parse_test_classes(yaml).unwrap_err();
        assert_eq!(err.error_code(), "ERR_JUNIT5_MISSING_FIELD");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "name: com.acme.FileTest").unwrap();

        assert_eq!(load_test_class(file.path()).unwrap().name, "com.acme.FileTest");
        assert_eq!(load_test_classes(file.path()).unwrap().len(), 1);

        let err = load_test_class("/no/such/descriptor.yml").unwrap_err();
        assert_eq!(err.error_code(), "ERR_JUNIT5_DESCRIPTOR_IO");
    }
}
