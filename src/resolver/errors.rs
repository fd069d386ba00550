//! Manifest error types and diagnostics.

use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

use crate::core::{Namespace, SourceUnit};
use crate::util::diagnostic::Diagnostic;

/// Coarse classification of a [`ManifestError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    DuplicateProvider,
    InvalidRuntimeBase,
    MissingDependency,
    MissingEntryPoint,
    CircularDependency,
    InvariantViolation,
}

/// Error raised while registering units or computing a manifest.
///
/// Every variant carries the structured data needed to render a message:
/// the namespace involved, the offending units, or the cycle.
#[derive(Debug, Error, MietteDiagnostic)]
pub enum ManifestError {
    #[error("namespace `{namespace}` is provided by both `{first}` and `{second}`")]
    #[diagnostic(
        code(manifest::duplicate_provide),
        help("each namespace must be provided by exactly one source unit")
    )]
    DuplicateProvider {
        namespace: Namespace,
        first: SourceUnit,
        second: SourceUnit,
    },

    #[error("runtime base `{unit_id}` must not declare provides or requires")]
    #[diagnostic(
        code(manifest::invalid_runtime_base),
        help("the runtime base provides the root namespace implicitly")
    )]
    InvalidRuntimeBase { unit_id: String },

    #[error("required namespace `{namespace}` is never provided (required by `{required_by}`)")]
    #[diagnostic(
        code(manifest::missing_provide),
        help("add the source unit that provides the namespace to the inputs")
    )]
    MissingDependency {
        namespace: Namespace,
        required_by: SourceUnit,
    },

    #[error("namespace entry point `{namespace}` is never provided")]
    #[diagnostic(code(manifest::missing_entry_point))]
    MissingEntryPoint { namespace: Namespace },

    #[error("circular dependency detected: {}", render_cycle(.cycle))]
    #[diagnostic(
        code(manifest::circular_dependency),
        help("break the cycle by removing one of the requires")
    )]
    CircularDependency {
        /// Closed cycle path, first element repeated at the end.
        cycle: Vec<Namespace>,
        /// Units along the cycle, in dependency direction.
        units: Vec<SourceUnit>,
    },

    #[error("internal invariant violated: {message}")]
    #[diagnostic(code(manifest::invariant))]
    InvariantViolation { message: String },
}

/// Join a closed cycle path with arrows: `a -> b -> a`.
pub fn render_cycle(cycle: &[Namespace]) -> String {
    cycle
        .iter()
        .map(|ns| ns.as_str())
        .collect::<Vec<_>>()
        .join(" -> ")
}

impl ManifestError {
    pub fn invariant(message: impl Into<String>) -> Self {
        ManifestError::InvariantViolation {
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ManifestError::DuplicateProvider { .. } => ErrorKind::DuplicateProvider,
            ManifestError::InvalidRuntimeBase { .. } => ErrorKind::InvalidRuntimeBase,
            ManifestError::MissingDependency { .. } => ErrorKind::MissingDependency,
            ManifestError::MissingEntryPoint { .. } => ErrorKind::MissingEntryPoint,
            ManifestError::CircularDependency { .. } => ErrorKind::CircularDependency,
            ManifestError::InvariantViolation { .. } => ErrorKind::InvariantViolation,
        }
    }

    /// Whether the error was caused by the input graph rather than a bug in
    /// the caller's use of the builder.
    pub fn is_input_error(&self) -> bool {
        !matches!(self, ManifestError::InvariantViolation { .. })
    }

    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            ManifestError::DuplicateProvider {
                namespace,
                first,
                second,
            } => Diagnostic::error(format!(
                "namespace `{}` is provided by multiple source units",
                namespace
            ))
            .with_context(format!("first provided by `{}`", first.id()))
            .with_context(format!("provided again by `{}`", second.id()))
            .with_location(second.id())
            .with_suggestion(format!(
                "Remove one of the `provide` declarations for `{}`",
                namespace
            )),

            ManifestError::InvalidRuntimeBase { unit_id } => {
                Diagnostic::error("runtime base declares explicit dependencies")
                    .with_location(unit_id.as_str())
                    .with_suggestion("Remove the provide/require declarations from the runtime base")
            }

            ManifestError::MissingDependency {
                namespace,
                required_by,
            } => Diagnostic::error(format!("namespace `{}` is never provided", namespace))
                .with_context(format!("required by `{}`", required_by.id()))
                .with_location(required_by.id())
                .with_suggestion(format!(
                    "Add the source unit that provides `{}` to the inputs",
                    namespace
                ))
                .with_suggestion("Check the require for typos"),

            ManifestError::MissingEntryPoint { namespace } => Diagnostic::error(format!(
                "namespace entry point `{}` is never provided",
                namespace
            ))
            .with_suggestion(format!(
                "Add the source unit that provides `{}` to the inputs",
                namespace
            )),

            ManifestError::CircularDependency { cycle, units } => {
                let mut diag = Diagnostic::error("circular dependency detected")
                    .with_context(format!("cycle: {}", render_cycle(cycle)));
                for unit in units {
                    diag = diag.with_context(format!("involves `{}`", unit.id()));
                }
                diag.with_suggestion(
                    "Break the cycle by removing or restructuring a require".to_string(),
                )
            }

            ManifestError::InvariantViolation { message } => {
                Diagnostic::error(format!("internal error: {}", message))
            }
        }
    }
}
