use std::fmt::{Display, Write};

use maud::Escaper;

/// Ordered set of HTML attributes for an avatar `<img>` tag.
///
/// Names are compared case-insensitively, as in HTML. Inserting an existing
/// name replaces its value but keeps its position.
///
/// # Example
///
/// ```rust
/// use tower_gravatar::HtmlAttributes;
///
/// let mut attributes = HtmlAttributes::new();
/// attributes.insert("alt", "Avatar");
/// attributes.insert("width", 80);
/// attributes.insert("ALT", "Profile picture");
///
/// assert_eq!(attributes.get("alt"), Some("Profile picture"));
/// assert_eq!(attributes.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HtmlAttributes(Vec<(String, String)>);

impl HtmlAttributes {
    /// Create an empty [`HtmlAttributes`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an attribute, stringifying its value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Display) {
        let name = name.into();
        let value = value.to_string();
        match self.0.iter_mut().find(|(n, _)| n.eq_ignore_ascii_case(&name)) {
            Some((_, existing)) => *existing = value,
            None => self.0.push((name, value)),
        }
    }

    /// Returns the value of the attribute `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Returns the number of attributes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no attributes.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over attributes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for HtmlAttributes
where
    K: Into<String>,
    V: Display,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut attributes = Self::new();
        attributes.extend(iter);
        attributes
    }
}

impl<K, V> Extend<(K, V)> for HtmlAttributes
where
    K: Into<String>,
    V: Display,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (name, value) in iter {
            self.insert(name, value);
        }
    }
}

/// Rendered `<img>` element.
#[derive(Debug)]
pub(crate) struct ImageTag<'a> {
    src: String,
    attributes: &'a HtmlAttributes,
}

impl<'a> ImageTag<'a> {
    pub(crate) fn new(src: String, attributes: &'a HtmlAttributes) -> Self {
        Self { src, attributes }
    }
}

impl std::fmt::Display for ImageTag<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut buffer = String::from("<img");
        push_attribute(&mut buffer, "src", &self.src)?;

        for (name, value) in self.attributes.iter() {
            if name.eq_ignore_ascii_case("src") {
                continue;
            }

            if !is_valid_name(name) {
                tracing::warn!(name, "skipping invalid attribute name");
                continue;
            }

            push_attribute(&mut buffer, name, value)?;
        }

        buffer.push_str(" />");
        f.write_str(&buffer)
    }
}

fn push_attribute(buffer: &mut String, name: &str, value: &str) -> std::fmt::Result {
    write!(buffer, " {name}=\"")?;
    Escaper::new(buffer).write_str(value)?;
    buffer.push('"');
    Ok(())
}

fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && !name.chars().any(|c| {
            c.is_whitespace() || c.is_control() || matches!(c, '"' | '\'' | '<' | '>' | '/' | '=')
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AvatarOptions, Gravatar};

    fn unescape(value: &str) -> String {
        value
            .replace("&quot;", "\"")
            .replace("&#39;", "'")
            .replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&amp;", "&")
    }

    // Extracts the unescaped value of `name` from a rendered tag.
    fn attribute(tag: &str, name: &str) -> Option<String> {
        let start = tag.find(&format!(" {name}=\""))? + name.len() + 3;
        let end = start + tag[start..].find('"')?;
        Some(unescape(&tag[start..end]))
    }

    #[test]
    fn src_cannot_be_overridden() {
        let gravatar = Gravatar::new();
        let options = AvatarOptions::new().default_image("identicon").force_default(true);
        let url = gravatar.avatar_url("jsmith@example.org", &options, &false);

        for src in ["src", "SRC", "Src"] {
            let attributes = HtmlAttributes::from_iter([(src, "http://www.google.com")]);
            let tag = gravatar.image_tag("jsmith@example.org", &options, &attributes, &false);
            assert_eq!(attribute(&tag, "src"), Some(url.clone()));
            assert_eq!(tag.matches("src=").count(), 1, "{tag}");
        }
    }

    #[test]
    fn custom_attributes_are_added_in_order() {
        let attributes = HtmlAttributes::from_iter([
            ("style", "display: block;"),
            ("alt", "My \"Gravatar\""),
            ("width", "80px"),
            ("height", "80px"),
        ]);
        let tag = Gravatar::new().image_tag("", &AvatarOptions::new(), &attributes, &true);

        assert!(tag.starts_with("<img src=\"https://secure.gravatar.com/avatar/?s=80\""));
        assert!(tag.ends_with(" />"));
        for (name, value) in attributes.iter() {
            assert_eq!(attribute(&tag, name).as_deref(), Some(value));
        }

        let positions: Vec<_> = ["style=", "alt=", "width=", "height="]
            .iter()
            .map(|name| tag.find(name).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn values_are_stringified() {
        let mut attributes = HtmlAttributes::new();
        attributes.insert("width", 80);
        attributes.insert("data-ratio", 1.5);
        let tag = Gravatar::new().image_tag("", &AvatarOptions::new(), &attributes, &false);
        assert!(tag.contains(r#" width="80" data-ratio="1.5" />"#), "{tag}");
    }

    #[test]
    fn invalid_names_are_skipped() {
        let attributes = HtmlAttributes::from_iter([
            ("onload=\"x\"", "1"),
            ("", "2"),
            ("a b", "3"),
            ("alt", "ok"),
        ]);
        let tag = Gravatar::new().image_tag("", &AvatarOptions::new(), &attributes, &false);
        assert_eq!(
            tag,
            r#"<img src="http://www.gravatar.com/avatar/?s=80" alt="ok" />"#
        );
    }

    #[test]
    fn src_is_escaped() {
        let options = AvatarOptions::new().rating(crate::Rating::G);
        let tag = Gravatar::new().image_tag("", &options, &HtmlAttributes::new(), &false);
        assert_eq!(
            tag,
            r#"<img src="http://www.gravatar.com/avatar/?s=80&amp;r=G" />"#
        );
    }

    #[test]
    fn attribute_values_are_escaped() {
        let attributes = HtmlAttributes::from_iter([("alt", r#"a & <b> "c""#)]);
        let tag = Gravatar::new().image_tag("", &AvatarOptions::new(), &attributes, &false);
        assert!(
            tag.ends_with(r#" alt="a &amp; &lt;b&gt; &quot;c&quot;" />"#),
            "{tag}"
        );
    }
}
