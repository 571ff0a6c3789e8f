//! Detection of teardown fixture methods on a call stack.

use tracing::trace;

/// Packages whose frames never count as fixture methods
pub const DEFAULT_CLEANUP_PACKAGES_TO_SKIP: &[&str] = &[
    "std::",
    "core::",
    "serenity_",
    "java.lang",
    "net.serenitybdd.core",
    "net.thucydides",
    "org.junit",
    "org.openqa.selenium",
];

/// Contributes annotation names that mark a method as cleanup code.
///
/// Test-runner integrations register their providers with
/// [`CleanupMethodLocator::new`].
pub trait CleanupMethodAnnotationProvider {
    fn cleanup_method_annotations(&self) -> Vec<String>;
}

/// Resolves the annotations declared on a method.
pub trait MethodAnnotationLookup {
    /// Annotation names of `class_name::method_name`, or `None` if the method is unknown
    fn annotations_of(&self, class_name: &str, method_name: &str) -> Option<Vec<String>>;
}

/// One entry of a call stack
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackFrame {
    pub class_name: String,
    pub method_name: String,
}

impl StackFrame {
    pub fn new(class_name: impl Into<String>, method_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            method_name: method_name.into(),
        }
    }
}

/// Decides whether the code currently running was called from a cleanup method.
///
/// A frame is a cleanup frame when its method carries an annotation whose
/// simple name starts with `After`, or one of the annotations contributed by
/// the registered providers.
#[derive(Debug, Clone)]
pub struct CleanupMethodLocator {
    cleanup_method_annotations: Vec<String>,
    packages_to_skip: Vec<String>,
}

impl CleanupMethodLocator {
    pub fn new(providers: &[&dyn CleanupMethodAnnotationProvider]) -> Self {
        let cleanup_method_annotations = providers
            .iter()
            .flat_map(|provider| provider.cleanup_method_annotations())
            .collect();

        Self {
            cleanup_method_annotations,
            packages_to_skip: DEFAULT_CLEANUP_PACKAGES_TO_SKIP
                .iter()
                .map(|p| p.to_string())
                .collect(),
        }
    }

    /// Replace the default list of skipped packages
    pub fn with_packages_to_skip<I, S>(mut self, packages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.packages_to_skip = packages.into_iter().map(Into::into).collect();
        self
    }

    pub fn cleanup_method_annotations(&self) -> &[String] {
        &self.cleanup_method_annotations
    }

    pub fn was_called_from_cleanup_method(
        &self,
        stack: &[StackFrame],
        lookup: &dyn MethodAnnotationLookup,
    ) -> bool {
        stack
            .iter()
            .any(|frame| self.is_annotated_with_a_fixture_method(frame, lookup))
    }

    fn is_annotated_with_a_fixture_method(
        &self,
        frame: &StackFrame,
        lookup: &dyn MethodAnnotationLookup,
    ) -> bool {
        if self.in_package_to_skip(&frame.class_name) {
            return false;
        }

        let Some(annotations) = lookup.annotations_of(&frame.class_name, &frame.method_name) else {
            return false;
        };

        let found = annotations.iter().any(|annotation| {
            is_an_after_annotation(annotation) || self.is_registered_cleanup_annotation(annotation)
        });
        if found {
            trace!(class = %frame.class_name, method = %frame.method_name, "Frame is a cleanup method");
        }
        found
    }

    fn in_package_to_skip(&self, class_name: &str) -> bool {
        self.packages_to_skip
            .iter()
            .any(|package| class_name.starts_with(package.as_str()))
    }

    fn is_registered_cleanup_annotation(&self, annotation: &str) -> bool {
        self.cleanup_method_annotations
            .iter()
            .any(|registered| registered == annotation || simple_name(registered) == simple_name(annotation))
    }
}

fn is_an_after_annotation(annotation: &str) -> bool {
    simple_name(annotation).starts_with("After")
}

/// `org.junit.jupiter.api.AfterEach` -> `AfterEach`
fn simple_name(annotation: &str) -> &str {
    let name = annotation.trim_start_matches('@');
    name.rsplit(|c: char| c == '.' || c == ':').next().unwrap_or(name)
}
