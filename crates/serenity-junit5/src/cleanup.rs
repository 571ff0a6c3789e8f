use serenity_core::CleanupMethodAnnotationProvider;

/// Teardown annotations of JUnit 5
pub const JUNIT5_CLEANUP_ANNOTATIONS: &[&str] = &[
    "org.junit.jupiter.api.AfterEach",
    "org.junit.jupiter.api.AfterAll",
];

/// Registers the JUnit 5 teardown annotations with a
/// [`CleanupMethodLocator`](serenity_core::CleanupMethodLocator)
#[derive(Debug, Clone, Copy, Default)]
pub struct Junit5CleanupAnnotations;

impl CleanupMethodAnnotationProvider for Junit5CleanupAnnotations {
    fn cleanup_method_annotations(&self) -> Vec<String> {
        JUNIT5_CLEANUP_ANNOTATIONS
            .iter()
            .map(|name| name.to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{AnnotationDescriptor, MethodDescriptor, TestClassCatalog, TestClassDescriptor};
    use serenity_core::{CleanupMethodLocator, StackFrame};

    fn catalog() -> TestClassCatalog {
        TestClassCatalog::new([TestClassDescriptor {
            name: "com.acme.CheckoutTest".to_string(),
            methods: vec![
                MethodDescriptor::new("closeBrowser")
                    .with_annotation(AnnotationDescriptor::marker("org.junit.jupiter.api.AfterEach")),
                MethodDescriptor::new("checksOut")
                    .with_annotation(AnnotationDescriptor::marker("org.junit.jupiter.api.Test")),
            ],
            enums: Default::default(),
        }])
    }

    #[test]
    fn test_provider_registers_junit5_annotations() {
        let locator = CleanupMethodLocator::new(&[&Junit5CleanupAnnotations]);
        assert_eq!(
            locator.cleanup_method_annotations(),
            ["org.junit.jupiter.api.AfterEach", "org.junit.jupiter.api.AfterAll"]
        );
    }

    #[test]
    fn test_detects_teardown_frame() {
        let locator = CleanupMethodLocator::new(&[&Junit5CleanupAnnotations]);
        let catalog = catalog();

        let from_teardown = [
            StackFrame::new("org.junit.platform.Runner", "run"),
            StackFrame::new("com.acme.CheckoutTest", "closeBrowser"),
        ];
        assert!(locator.was_called_from_cleanup_method(&from_teardown, &catalog));

        let from_test = [StackFrame::new("com.acme.CheckoutTest", "checksOut")];
        assert!(!locator.was_called_from_cleanup_method(&from_test, &catalog));
    }
}
