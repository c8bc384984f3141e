use serde::{Deserialize, Serialize};
use std::fmt;

/// Element locator understood by every browser backend.
///
/// In configuration files a selector is written as a single-key map:
///
/// ```yaml
/// - css: "#comp-lopj2yq19 h5"
/// - xpath: "//h2[@id='values']"
/// - text: { tag: a, contains: "Who we are" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Selector {
    Css(String),
    #[serde(rename = "xpath")]
    XPath(String),
    /// First `tag` element whose normalised visible text contains `contains`.
    /// With the wildcard tag `*` only an element's own text nodes are
    /// matched, otherwise `<html>` would win every lookup.
    Text {
        #[serde(default = "any_tag")]
        tag: String,
        contains: String,
    },
}

fn any_tag() -> String {
    "*".into()
}

impl Selector {
    pub fn css(css: impl Into<String>) -> Self {
        Self::Css(css.into())
    }

    pub fn xpath(xpath: impl Into<String>) -> Self {
        Self::XPath(xpath.into())
    }

    pub fn text(tag: impl Into<String>, contains: impl Into<String>) -> Self {
        Self::Text {
            tag: tag.into(),
            contains: contains.into(),
        }
    }

    /// The CSS form, when this selector is CSS.
    pub fn as_css(&self) -> Option<&str> {
        match self {
            Self::Css(css) => Some(css),
            _ => None,
        }
    }

    /// The XPath form for XPath and text selectors; `None` for CSS.
    pub fn to_xpath(&self) -> Option<String> {
        match self {
            Self::Css(_) => None,
            Self::XPath(xpath) => Some(xpath.clone()),
            Self::Text { tag, contains } if tag == "*" => Some(format!(
                "//*[text()[contains(normalize-space(.), {})]]",
                xpath_literal(contains)
            )),
            Self::Text { tag, contains } => Some(format!(
                "//{tag}[contains(normalize-space(.), {})]",
                xpath_literal(contains)
            )),
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Css(css) => write!(f, "css:{css}"),
            Self::XPath(xpath) => write!(f, "xpath:{xpath}"),
            Self::Text { tag, contains } => write!(f, "{tag}:has-text('{contains}')"),
        }
    }
}

/// Quote `s` as an XPath 1.0 string literal. XPath has no escape syntax, so a
/// value holding both quote kinds is split and rebuilt with `concat()`.
fn xpath_literal(s: &str) -> String {
    if !s.contains('\'') {
        return format!("'{s}'");
    }
    if !s.contains('"') {
        return format!("\"{s}\"");
    }
    let parts: Vec<String> = s.split('\'').map(|p| format!("'{p}'")).collect();
    format!("concat({})", parts.join(", \"'\", "))
}
