//! Session identifier convention shared with the host application.
//!
//! The host registers its background session under the identifier derived
//! here, so the runtime redelivers our failed transfer to it. A random
//! identifier per call could never be discovered by the host.

/// `<prefix>.<extension name>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionIdentifierScheme {
    prefix: String,
}

impl SessionIdentifierScheme {
    pub fn new(prefix: impl Into<String>) -> Self {
        let prefix: String = prefix.into();
        Self {
            prefix: prefix.trim_end_matches('.').to_string(),
        }
    }

    pub fn derive(&self, extension_name: &str) -> String {
        format!("{}.{}", self.prefix, extension_name)
    }

    /// True if `identifier` was produced by this convention.
    pub fn owns(&self, identifier: &str) -> bool {
        identifier
            .strip_prefix(self.prefix.as_str())
            .and_then(|rest| rest.strip_prefix('.'))
            .is_some_and(|name| !name.is_empty() && !name.contains('.'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derive_is_deterministic() {
        let scheme = SessionIdentifierScheme::new("org.example.Session");
        assert_eq!(scheme.derive("action"), "org.example.Session.action");
        assert_eq!(scheme.derive("action"), scheme.derive("action"));
    }

    #[test]
    fn trailing_dot_in_prefix_is_ignored() {
        let scheme = SessionIdentifierScheme::new("org.example.Session.");
        assert_eq!(scheme.derive("action"), "org.example.Session.action");
    }

    #[test]
    fn owns_only_its_own_identifiers() {
        let scheme = SessionIdentifierScheme::new("org.example.Session");
        assert!(scheme.owns("org.example.Session.action"));
        assert!(!scheme.owns("org.example.Session"));
        assert!(!scheme.owns("org.example.Session."));
        assert!(!scheme.owns("org.example.SessionX.action"));
        assert!(!scheme.owns("org.example.Session.a.b"));
        assert!(!scheme.owns("com.other.action"));
    }
}
