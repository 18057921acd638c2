//! Boilerplate comment templates.
//!
//! Each template ends with an HTML marker line identifying the boilerplate;
//! the marker is how repeated runs recognize a comment they already posted.

use crate::error::{DocsSyncError, Result};

/// Raw template text by name
fn template_text(name: &str) -> Result<&'static str> {
    match name {
        "welcome" => Ok(include_str!("data/welcome.md")),
        "no_body_nag" => Ok(include_str!("data/no_body_nag.md")),
        "guarded_path_changes" => Ok(include_str!("data/guarded_path_changes.md")),
        other => Err(DocsSyncError::template(format!(
            "Unknown boilerplate template '{}'",
            other
        ))),
    }
}

/// Render a template, substituting `{key}` placeholders
///
/// Validates that the result ends with an identifying marker line.
pub fn render(name: &str, substitutions: &[(&str, &str)]) -> Result<String> {
    let mut text = template_text(name)?.trim_end_matches('\n').to_string();
    for (key, value) in substitutions {
        text = text.replace(&format!("{{{}}}", key), value);
    }

    let last = text.lines().last().unwrap_or("");
    if !(last.starts_with("<!--- boilerplate: ") && last.ends_with(" --->")) {
        return Err(DocsSyncError::template(format!(
            "Template '{}' must end with an identifying boilerplate marker",
            name
        )));
    }

    Ok(text)
}

/// The marker line of a rendered comment body, if it carries one
pub fn marker_line(body: &str) -> Option<&str> {
    body.lines()
        .last()
        .filter(|last| last.starts_with("<!--- boilerplate: ") && last.ends_with(" --->"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_welcome_has_marker() {
        let body = render("welcome", &[]).unwrap();
        assert_eq!(
            marker_line(&body),
            Some("<!--- boilerplate: welcome --->")
        );
    }

    #[test]
    fn test_render_substitutes_placeholders() {
        let body = render(
            "guarded_path_changes",
            &[("changed_files", "- docs/a.rst\n- docs/b.rst")],
        )
        .unwrap();
        assert!(body.contains("- docs/a.rst\n- docs/b.rst"));
        assert!(!body.contains("{changed_files}"));
    }

    #[test]
    fn test_render_unknown_template() {
        assert!(render("missing", &[]).is_err());
    }

    #[test]
    fn test_marker_line_absent() {
        assert_eq!(marker_line("just a comment"), None);
    }
}
