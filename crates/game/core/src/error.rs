//! Common error infrastructure for gameplay-core.
//!
//! Runtime lookups never fail loudly: an unknown ability, effect, tag or
//! handle simply drops the request that referenced it. The error types in
//! this crate therefore only describe *build-time* problems with authored
//! data (tag hierarchies, effect and ability tables). They share the
//! classification below so loaders and tools can report them uniformly.

/// Severity level of an error.
///
/// Every error this crate can produce comes from authored data, so there is
/// a single class today.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Invalid input, should not retry without changes.
    ///
    /// Examples: duplicate tag id, unknown parent, tag count above mask width
    Validation,
}

/// Common trait for all gameplay-core errors.
///
/// # Implementation Guidelines
///
/// - All error enums should implement this trait
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
pub trait GameplayError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    ///
    /// Default implementation uses the error type name.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
