//! # Serenity Core
//!
//! Runtime support shared by the Serenity BDD test-runner integrations:
//!
//! * [`EnvironmentVariables`]: the property store test runs are configured from,
//!   including environment-specific overrides
//! * [`logging`]: structured logging initialisation using `tracing`
//! * [`CleanupMethodLocator`]: detects whether a call stack passes through a
//!   teardown fixture method

mod cleanup;
mod environment;
mod error;

pub mod logging;

pub use cleanup::{
    CleanupMethodAnnotationProvider, CleanupMethodLocator, MethodAnnotationLookup, StackFrame,
    DEFAULT_CLEANUP_PACKAGES_TO_SKIP,
};
pub use environment::EnvironmentVariables;
pub use error::{CoreError, CoreResult};
