use crate::error::{DocsSyncError, Result};
use crate::domain::version::Version;

/// Ensure a tag/version string has a `v` prefix
pub fn v_prefix(name: &str) -> String {
    format!("v{}", name.trim_start_matches('v'))
}

/// Determine the `stable-X.Y` branch a tag belongs to
///
/// Example: "v2.16.1" -> "stable-2.16"
pub fn series_branch(tag_name: &str) -> Result<String> {
    let version = Version::parse(tag_name)?;
    Ok(format!("stable-{}", version.series()))
}

/// Tag message template with `{version}` and `{branch}` placeholders
#[derive(Debug, Clone)]
pub struct MessageTemplate {
    pub template: String,
}

impl MessageTemplate {
    /// Create a template from a pattern string
    pub fn new(template: impl Into<String>) -> Self {
        MessageTemplate {
            template: template.into(),
        }
    }

    /// The snapshot message used for mirrored release tags
    pub fn snapshot_default() -> Self {
        MessageTemplate::new(
            "{version}\n\n\
             This tag contains a snapshot of the documentation {branch} branch\n\
             at the time of the upstream {version} release.\n",
        )
    }

    /// Render the template for a tag and branch
    ///
    /// The version placeholder receives the tag name without its `v` prefix.
    pub fn render(&self, tag_name: &str, branch: &str) -> Result<String> {
        if !self.template.contains("{version}") {
            return Err(DocsSyncError::template(
                "Tag message template must contain a {version} placeholder",
            ));
        }
        let version_str = tag_name.trim_start_matches('v');
        Ok(self
            .template
            .replace("{version}", version_str)
            .replace("{branch}", branch))
    }
}
