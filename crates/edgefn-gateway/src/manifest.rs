//! Site manifest parsing
//!
//! Parses the edgefn.yaml site manifest with environment variable
//! substitution. The manifest is the single declarative source of truth for
//! the functions mount prefix, the edge redirect rules, and the static
//! publish directory; changing any of them never requires a code change.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use anyhow::{Context, Result};

/// The site manifest (edgefn.yaml)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteManifest {
    /// Site metadata
    pub site: SiteInfo,

    /// Function mount configuration
    #[serde(default)]
    pub functions: FunctionsConfig,

    /// Edge redirect rules, evaluated in order (first match wins)
    #[serde(default)]
    pub redirects: Vec<RedirectRule>,
}

/// Site metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteInfo {
    /// Site name (unique identifier)
    pub name: String,

    /// Directory the static file layer serves from; relative paths are
    /// resolved against the manifest's own directory
    #[serde(default = "default_publish_dir")]
    pub publish_dir: PathBuf,
}

/// Function mount configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionsConfig {
    /// Path prefix functions are mounted under; a function named `api` is
    /// reachable at `<prefix>/api`
    #[serde(default = "default_functions_prefix")]
    pub prefix: String,
}

/// A declarative edge redirect rule.
///
/// Status 200 rules are internal rewrites: the request path is replaced
/// before function resolution and the client never sees the internal path.
/// 3xx rules answer with a `Location` header instead of routing anywhere.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedirectRule {
    /// Source path pattern: an exact path, or a prefix with a trailing
    /// `/*` wildcard (e.g. `/api/*`)
    pub source: String,

    /// Target path; `:splat` is replaced by the wildcard capture
    pub target: String,

    /// 200 for an internal rewrite, or a 3xx redirect code
    #[serde(default = "default_redirect_status")]
    pub status: u16,

    /// Methods the rule applies to; `"*"` matches every method
    #[serde(default = "default_redirect_methods")]
    pub methods: Vec<String>,
}

fn default_publish_dir() -> PathBuf { PathBuf::from("public") }
fn default_functions_prefix() -> String { "/.netlify/functions".to_string() }
fn default_redirect_status() -> u16 { 200 }
fn default_redirect_methods() -> Vec<String> { vec!["GET".to_string()] }

impl Default for FunctionsConfig {
    fn default() -> Self {
        Self { prefix: default_functions_prefix() }
    }
}

impl SiteManifest {
    /// Parse a manifest from YAML content
    pub fn parse(yaml: &str) -> Result<Self> {
        // First, substitute environment variables
        let expanded = expand_env_vars(yaml);

        // Then parse
        serde_yaml::from_str(&expanded)
            .context("Failed to parse site manifest")
    }

    /// Load a manifest from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read manifest file: {:?}", path.as_ref()))?;
        Self::parse(&content)
    }

    /// Validate the manifest
    pub fn validate(&self) -> Result<()> {
        if self.site.name.is_empty() {
            anyhow::bail!("Site name is required");
        }
        if !self.functions.prefix.starts_with('/') || self.functions.prefix.len() < 2 {
            anyhow::bail!(
                "Functions prefix must be an absolute path, got '{}'",
                self.functions.prefix
            );
        }

        for rule in &self.redirects {
            if !rule.source.starts_with('/') {
                anyhow::bail!("Redirect source must be an absolute path: '{}'", rule.source);
            }
            if !rule.target.starts_with('/') {
                anyhow::bail!("Redirect target must be an absolute path: '{}'", rule.target);
            }
            if rule.source.contains('*') && !rule.source.ends_with("/*") {
                anyhow::bail!(
                    "Redirect source may only use a trailing '/*' wildcard: '{}'",
                    rule.source
                );
            }
            if !rule.source.ends_with("/*") && rule.target.contains(":splat") {
                anyhow::bail!(
                    "Redirect target '{}' uses :splat but source '{}' has no wildcard",
                    rule.target,
                    rule.source
                );
            }
            if rule.status != 200 && !(300..400).contains(&rule.status) {
                anyhow::bail!(
                    "Redirect status must be 200 (rewrite) or a 3xx code, got {}",
                    rule.status
                );
            }
            if rule.methods.is_empty() {
                anyhow::bail!("Redirect rule '{}' must allow at least one method", rule.source);
            }
        }

        Ok(())
    }
}

/// Expand environment variables in a string
/// Supports: ${VAR}, ${VAR:-default}, $VAR
fn expand_env_vars(input: &str) -> String {
    let mut result = input.to_string();

    // Pattern: ${VAR:-default} or ${VAR}
    let re = regex_lite::Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}").unwrap();
    result = re.replace_all(&result, |caps: &regex_lite::Captures| {
        let var_name = &caps[1];
        let default = caps.get(2).map(|m| m.as_str());

        std::env::var(var_name)
            .unwrap_or_else(|_| default.unwrap_or("").to_string())
    }).to_string();

    // Pattern: $VAR (simple)
    let re = regex_lite::Regex::new(r"\$([A-Za-z_][A-Za-z0-9_]*)").unwrap();
    result = re.replace_all(&result, |caps: &regex_lite::Captures| {
        let var_name = &caps[1];
        std::env::var(var_name).unwrap_or_default()
    }).to_string();

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_manifest() {
        let yaml = r#"
site:
  name: my-site
"#;

        let manifest = SiteManifest::parse(yaml).unwrap();
        assert_eq!(manifest.site.name, "my-site");
        assert_eq!(manifest.site.publish_dir, PathBuf::from("public"));
        assert_eq!(manifest.functions.prefix, "/.netlify/functions");
        assert!(manifest.redirects.is_empty());
        manifest.validate().unwrap();
    }

    #[test]
    fn test_parse_template_manifest() {
        let yaml = r#"
site:
  name: hello-functions
  publish_dir: public

functions:
  prefix: /.netlify/functions

redirects:
  - source: /api/*
    target: /.netlify/functions/api/:splat
    status: 200
    methods: [GET]
"#;

        let manifest = SiteManifest::parse(yaml).unwrap();
        manifest.validate().unwrap();

        assert_eq!(manifest.site.name, "hello-functions");
        assert_eq!(manifest.redirects.len(), 1);

        let rule = &manifest.redirects[0];
        assert_eq!(rule.source, "/api/*");
        assert_eq!(rule.target, "/.netlify/functions/api/:splat");
        assert_eq!(rule.status, 200);
        assert_eq!(rule.methods, vec!["GET".to_string()]);
    }

    #[test]
    fn test_redirect_rule_defaults() {
        let yaml = r#"
site:
  name: defaults

redirects:
  - source: /api/*
    target: /.netlify/functions/api/:splat
"#;

        let manifest = SiteManifest::parse(yaml).unwrap();
        let rule = &manifest.redirects[0];
        assert_eq!(rule.status, 200);
        assert_eq!(rule.methods, vec!["GET".to_string()]);
    }

    #[test]
    fn test_env_var_expansion() {
        std::env::set_var("EDGEFN_TEST_PREFIX", "/.netlify/functions");

        let yaml = r#"
site:
  name: expanded

functions:
  prefix: ${EDGEFN_TEST_PREFIX}
"#;

        let manifest = SiteManifest::parse(yaml).unwrap();
        assert_eq!(manifest.functions.prefix, "/.netlify/functions");

        let with_default = expand_env_vars("${EDGEFN_TEST_MISSING:-/fallback}");
        assert_eq!(with_default, "/fallback");
    }

    #[test]
    fn test_validate_rejects_bad_rules() {
        let base = r#"
site:
  name: bad

redirects:
  - source: %SOURCE%
    target: %TARGET%
    status: %STATUS%
"#;

        let cases = [
            // Wildcard not at the end
            ("/api/*/v1", "/fns/api/:splat", "200"),
            // :splat without a wildcard source
            ("/api", "/fns/api/:splat", "200"),
            // Status outside 200/3xx
            ("/api/*", "/fns/api/:splat", "404"),
            // Relative source
            ("api/*", "/fns/api/:splat", "200"),
        ];

        for (source, target, status) in cases {
            let yaml = base
                .replace("%SOURCE%", source)
                .replace("%TARGET%", target)
                .replace("%STATUS%", status);
            let manifest = SiteManifest::parse(&yaml).unwrap();
            assert!(
                manifest.validate().is_err(),
                "expected validation failure for source={source} target={target} status={status}"
            );
        }
    }

    #[test]
    fn test_validate_rejects_empty_method_list() {
        let yaml = r#"
site:
  name: bad

redirects:
  - source: /api/*
    target: /.netlify/functions/api/:splat
    methods: []
"#;

        let manifest = SiteManifest::parse(yaml).unwrap();
        assert!(manifest.validate().is_err());
    }
}
