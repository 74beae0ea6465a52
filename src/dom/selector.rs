use std::fmt::{self, Display};
use std::str::FromStr;

use serde_with::{DeserializeFromStr, SerializeDisplay};

use super::Node;

/// Compound selector: optional tag, optional `#id`, any number of `.class`.
///
/// Descendant combinators are not supported; targets name roots directly.
#[derive(Clone, Debug, DeserializeFromStr, Eq, Hash, PartialEq, SerializeDisplay)]
pub struct Selector {
    source: String,
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
}

impl Selector {
    /// Selector naming a bare tag, e.g. `body`.
    pub(crate) fn for_tag(tag: &str) -> Self {
        Self {
            source: tag.to_string(),
            tag: Some(tag.to_ascii_lowercase()),
            id: None,
            classes: Vec::new(),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    #[must_use]
    pub fn matches(&self, node: &Node) -> bool {
        self.tag.as_deref().is_none_or(|tag| node.tag == tag)
            && self
                .id
                .as_deref()
                .is_none_or(|id| node.id.as_deref() == Some(id))
            && self.classes.iter().all(|class| node.has_class(class))
    }
}

impl Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl FromStr for Selector {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let source = s.trim();
        if source.is_empty() {
            return Err("selector cannot be empty".to_string());
        }

        let mut selector = Self {
            source: source.to_string(),
            tag: None,
            id: None,
            classes: Vec::new(),
        };

        // Split into (sigil, name) segments: "div#main.a.b" -> ('', div) ('#', main) ('.', a) ('.', b)
        let mut rest = source;
        let mut sigil = None;
        loop {
            let end = rest.find(['#', '.']).unwrap_or(rest.len());
            let name = &rest[..end];
            if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
                return Err(format!("unsupported selector: {source}"));
            }
            match sigil {
                None if name.is_empty() => {}
                None => selector.tag = Some(name.to_ascii_lowercase()),
                Some(_) if name.is_empty() => {
                    return Err(format!("dangling `#` or `.` in selector: {source}"));
                }
                Some('#') if selector.id.is_some() => {
                    return Err(format!("selector names two ids: {source}"));
                }
                Some('#') => selector.id = Some(name.to_string()),
                Some(_) => selector.classes.push(name.to_string()),
            }
            let Some(next) = rest[end..].chars().next() else {
                break;
            };
            sigil = Some(next);
            rest = &rest[end + next.len_utf8()..];
        }

        Ok(selector)
    }
}
