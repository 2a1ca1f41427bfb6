//! Subdomain and resource naming
//!
//! Every name used for remote resources is derived here from the branch,
//! the configured subdomain and the DNS zone domain.
//!
//! Two branches that sanitize to the same string (`my_branch!` and
//! `my..branch???` both become `mybranch`) share one subdomain and one set
//! of zones. That collision is deliberate and not resolved here.

use crate::error::{CoreError, Result};
use crate::inputs::DeploymentInputs;

/// Names derived once per run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceIdentity {
    /// Record name inside the DNS zone; empty for the apex
    pub subdomain: String,
    /// Fully qualified public hostname
    pub deployment_name: String,
    /// Storage zone and pull zone name, reversed and dash-joined
    pub resource_name: String,
}

impl ResourceIdentity {
    /// Resolve the identity for `branch_current` deployed under `domain`.
    ///
    /// Branch names must already be normalized (see
    /// [`crate::inputs::normalize_branch`]).
    pub fn resolve(
        branch_current: &str,
        branch_main: &str,
        dns_subdomain: &str,
        domain: &str,
    ) -> Result<Self> {
        let mut pieces: Vec<String> = Vec::new();

        if branch_current != branch_main {
            let sanitized = sanitize_branch(branch_current);
            if sanitized.is_empty() {
                return Err(CoreError::InvalidInput(format!(
                    "branch '{}' has no characters usable in a subdomain",
                    branch_current
                )));
            }
            pieces.push(sanitized);
        }

        pieces.extend(
            dns_subdomain
                .split('.')
                .filter(|segment| !segment.is_empty())
                .map(str::to_lowercase),
        );

        let domain_pieces: Vec<String> = domain
            .trim()
            .trim_end_matches('.')
            .split('.')
            .map(str::to_lowercase)
            .collect();
        if domain_pieces.iter().any(String::is_empty) {
            return Err(CoreError::InvalidName {
                name: domain.to_string(),
                reason: "DNS zone domain has an empty label".into(),
            });
        }

        let subdomain = pieces.join(".");

        let mut all_pieces = pieces;
        all_pieces.extend(domain_pieces);

        let deployment_name = all_pieces.join(".");
        let resource_name = all_pieces
            .iter()
            .rev()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join("-");

        if let Some(c) = resource_name
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '-'))
        {
            return Err(CoreError::InvalidName {
                name: resource_name.clone(),
                reason: format!("'{}' is not allowed in a zone name", c),
            });
        }

        tracing::debug!(
            "Resolved names: subdomain='{}' deployment='{}' resource='{}'",
            subdomain,
            deployment_name,
            resource_name
        );

        Ok(Self {
            subdomain,
            deployment_name,
            resource_name,
        })
    }

    pub fn from_inputs(inputs: &DeploymentInputs, domain: &str) -> Result<Self> {
        Self::resolve(
            inputs.branch_current(),
            inputs.branch_main(),
            inputs.dns_subdomain(),
            domain,
        )
    }

    /// True when the CNAME record sits on the zone apex
    pub fn is_apex(&self) -> bool {
        self.subdomain.is_empty()
    }
}

/// Strip everything outside `[a-z0-9-]`
pub fn sanitize_branch(branch: &str) -> String {
    branch
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-')
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_main_branch_without_subdomain_is_apex() {
        let id = ResourceIdentity::resolve("main", "main", "", "example.com").unwrap();
        assert_eq!(id.subdomain, "");
        assert!(id.is_apex());
        assert_eq!(id.deployment_name, "example.com");
        assert_eq!(id.resource_name, "com-example");
    }

    #[test]
    fn test_main_branch_with_subdomain() {
        let id = ResourceIdentity::resolve("main", "main", "docs.beta", "Example.com").unwrap();
        assert_eq!(id.subdomain, "docs.beta");
        assert_eq!(id.deployment_name, "docs.beta.example.com");
        assert_eq!(id.resource_name, "com-example-beta-docs");
    }

    #[test]
    fn test_feature_branch_prefixes_subdomain() {
        let id = ResourceIdentity::resolve("feature-1", "main", "docs", "example.com").unwrap();
        assert_eq!(id.subdomain, "feature-1.docs");
        assert_eq!(id.deployment_name, "feature-1.docs.example.com");
        assert_eq!(id.resource_name, "com-example-docs-feature-1");
    }

    #[test]
    fn test_empty_subdomain_segments_are_skipped() {
        let id = ResourceIdentity::resolve("main", "main", ".docs..", "example.com").unwrap();
        assert_eq!(id.subdomain, "docs");
    }

    #[test]
    fn test_sanitize_branch() {
        assert_eq!(sanitize_branch("my_branch!"), "mybranch");
        assert_eq!(sanitize_branch("my..branch???"), "mybranch");
        assert_eq!(sanitize_branch("fix-123"), "fix-123");
    }

    #[test]
    fn test_sanitized_branches_collide() {
        let a = ResourceIdentity::resolve("my_branch!", "main", "", "example.com").unwrap();
        let b = ResourceIdentity::resolve("my..branch???", "main", "", "example.com").unwrap();

        assert_eq!(a.subdomain, "mybranch");
        assert_eq!(a, b);
        assert_eq!(a.resource_name, "com-example-mybranch");
    }

    #[test]
    fn test_trailing_dot_domain() {
        let id = ResourceIdentity::resolve("main", "main", "", "example.com.").unwrap();
        assert_eq!(id.deployment_name, "example.com");
    }

    #[test]
    fn test_invalid_domain_label() {
        let err = ResourceIdentity::resolve("main", "main", "", "example..com").unwrap_err();
        assert!(matches!(err, CoreError::InvalidName { .. }));

        let err = ResourceIdentity::resolve("main", "main", "", "exa_mple.com").unwrap_err();
        assert!(matches!(err, CoreError::InvalidName { .. }));
    }

    #[test]
    fn test_unusable_branch_is_rejected() {
        let err = ResourceIdentity::resolve("___", "main", "", "example.com").unwrap_err();
        assert!(matches!(err, CoreError::InvalidInput(_)));
    }
}
