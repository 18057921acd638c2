use regex::Regex;

/// A single CODEOWNERS rule: a path pattern and the owners it assigns
#[derive(Debug, Clone)]
struct OwnerRule {
    regex: Regex,
    owners: Vec<String>,
}

/// Parsed CODEOWNERS file
///
/// Patterns follow the usual gitignore-style subset: `*` matches within a
/// path segment, `**` crosses segments, a leading `/` anchors to the
/// repository root and a trailing `/` matches everything under a directory.
/// When several rules match a path, the last one wins.
#[derive(Debug, Clone)]
pub struct CodeOwners {
    rules: Vec<OwnerRule>,
}

impl CodeOwners {
    /// Parse CODEOWNERS content
    ///
    /// Comment and blank lines are skipped, as are rules whose pattern cannot
    /// be translated (none of the common patterns fail).
    pub fn parse(content: &str) -> Self {
        let mut rules = Vec::new();

        for line in content.lines() {
            let line = line.split('#').next().unwrap_or("").trim();
            if line.is_empty() {
                continue;
            }

            let mut fields = line.split_whitespace();
            let pattern = match fields.next() {
                Some(p) => p,
                None => continue,
            };
            let owners: Vec<String> = fields.map(|s| s.to_string()).collect();
            if owners.is_empty() {
                continue;
            }

            if let Some(regex) = translate_pattern(pattern) {
                rules.push(OwnerRule { regex, owners });
            }
        }

        CodeOwners { rules }
    }

    /// Owners assigned to a path, or an empty slice when no rule matches
    pub fn owners_of(&self, path: &str) -> &[String] {
        self.rules
            .iter()
            .rev()
            .find(|rule| rule.regex.is_match(path))
            .map(|rule| rule.owners.as_slice())
            .unwrap_or(&[])
    }
}

/// Translate a CODEOWNERS pattern into an anchored path regex
fn translate_pattern(pattern: &str) -> Option<Regex> {
    let anchored = pattern.starts_with('/');
    let dir_only = pattern.ends_with('/');
    let trimmed = pattern.trim_start_matches('/').trim_end_matches('/');

    let escaped = regex::escape(trimmed);
    let translated = escaped
        .replace(r"\*\*/", "(?:.*/)?")
        .replace(r"\*\*", ".*")
        .replace(r"\*", "[^/]*")
        .replace(r"\?", "[^/]");

    let prefix = if anchored { "^" } else { "^(?:.*/)?" };
    // A pattern naming a directory also matches every path below it
    let suffix = if dir_only { "/.*$" } else { "(?:/.*)?$" };

    Regex::new(&format!("{}{}{}", prefix, translated, suffix)).ok()
}
