//! Core metadata document and its `PKG-INFO` serialization.

use std::fmt::Write;

/// Metadata version written when none is set explicitly.
pub const DEFAULT_METADATA_VERSION: &str = "2.1";

/// Indentation used for continuation lines of multi-line header values.
const CONTINUATION: &str = "        ";

/// A person listed as author or maintainer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Contact {
    /// Display name.
    pub name: Option<String>,
    /// E-mail address.
    pub email: Option<String>,
}

impl Contact {
    /// Contact with only a display name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            email: None,
        }
    }

    /// Contact with a name and an address.
    pub fn with_email(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            email: Some(email.into()),
        }
    }
}

/// The package's descriptive metadata.
///
/// Serialized with [`MetadataDocument::to_rfc822`] into the `PKG-INFO`
/// header block embedded at the root of every sdist.
///
/// # Examples
///
/// ```
/// use sdist_core::MetadataDocument;
///
/// let mut doc = MetadataDocument::new("demo", "0.1.0");
/// doc.summary = Some("A demo package".into());
///
/// let text = String::from_utf8(doc.to_rfc822()).unwrap();
/// assert!(text.starts_with("Metadata-Version: 2.1\nName: demo\nVersion: 0.1.0\n"));
/// assert!(text.contains("Summary: A demo package\n"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataDocument {
    /// `Metadata-Version` header.
    pub metadata_version: String,
    /// Distribution name.
    pub name: String,
    /// Distribution version.
    pub version: String,
    /// One-line summary.
    pub summary: Option<String>,
    /// Search keywords, joined with commas.
    pub keywords: Vec<String>,
    /// Legacy home page URL.
    pub home_page: Option<String>,
    /// Legacy download URL.
    pub download_url: Option<String>,
    /// `(label, url)` pairs.
    pub project_urls: Vec<(String, String)>,
    /// Authors.
    pub authors: Vec<Contact>,
    /// Maintainers.
    pub maintainers: Vec<Contact>,
    /// License text or identifier.
    pub license: Option<String>,
    /// Trove classifiers.
    pub classifiers: Vec<String>,
    /// Python version specifier.
    pub requires_python: Option<String>,
    /// Requirement strings, markers included.
    pub requires_dist: Vec<String>,
    /// Extra names.
    pub provides_extra: Vec<String>,
    /// MIME type of the description body.
    pub description_content_type: Option<String>,
    /// Long description; written as the message body.
    pub description: Option<String>,
}

impl MetadataDocument {
    /// Creates a document with just the required fields.
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            metadata_version: DEFAULT_METADATA_VERSION.to_string(),
            name: name.into(),
            version: version.into(),
            summary: None,
            keywords: Vec::new(),
            home_page: None,
            download_url: None,
            project_urls: Vec::new(),
            authors: Vec::new(),
            maintainers: Vec::new(),
            license: None,
            classifiers: Vec::new(),
            requires_python: None,
            requires_dist: Vec::new(),
            provides_extra: Vec::new(),
            description_content_type: None,
            description: None,
        }
    }

    /// Serializes the document as an RFC-822 style header block.
    ///
    /// Fields are emitted in a fixed order, multi-valued fields repeat their
    /// key, and the description (if any) follows a blank line as the body.
    #[must_use]
    pub fn to_rfc822(&self) -> Vec<u8> {
        let mut out = String::new();

        push_field(&mut out, "Metadata-Version", &self.metadata_version);
        push_field(&mut out, "Name", &self.name);
        push_field(&mut out, "Version", &self.version);
        push_opt(&mut out, "Summary", self.summary.as_deref());
        if !self.keywords.is_empty() {
            push_field(&mut out, "Keywords", &self.keywords.join(","));
        }
        push_opt(&mut out, "Home-page", self.home_page.as_deref());
        push_opt(&mut out, "Download-URL", self.download_url.as_deref());
        for (label, url) in &self.project_urls {
            push_field(&mut out, "Project-URL", &format!("{label}, {url}"));
        }

        let (author_names, author_emails) = split_contacts(&self.authors);
        push_opt(&mut out, "Author", author_names.as_deref());
        push_opt(&mut out, "Author-email", author_emails.as_deref());
        let (maintainer_names, maintainer_emails) = split_contacts(&self.maintainers);
        push_opt(&mut out, "Maintainer", maintainer_names.as_deref());
        push_opt(&mut out, "Maintainer-email", maintainer_emails.as_deref());

        push_opt(&mut out, "License", self.license.as_deref());
        for classifier in &self.classifiers {
            push_field(&mut out, "Classifier", classifier);
        }
        push_opt(&mut out, "Requires-Python", self.requires_python.as_deref());
        for req in &self.requires_dist {
            push_field(&mut out, "Requires-Dist", req);
        }
        for extra in &self.provides_extra {
            push_field(&mut out, "Provides-Extra", extra);
        }
        push_opt(
            &mut out,
            "Description-Content-Type",
            self.description_content_type.as_deref(),
        );

        if let Some(description) = &self.description {
            out.push('\n');
            out.push_str(description);
            if !description.ends_with('\n') {
                out.push('\n');
            }
        }

        out.into_bytes()
    }
}

fn push_opt(out: &mut String, key: &str, value: Option<&str>) {
    if let Some(value) = value {
        push_field(out, key, value);
    }
}

fn push_field(out: &mut String, key: &str, value: &str) {
    let mut lines = value.lines();
    let first = lines.next().unwrap_or("");
    // Writing to a String cannot fail.
    let _ = writeln!(out, "{key}: {first}");
    for line in lines {
        let _ = writeln!(out, "{CONTINUATION}{line}");
    }
}

/// Splits contacts into the name-only header and the e-mail header.
///
/// Contacts with an address go to the e-mail header as `Name <addr>`;
/// name-only contacts go to the plain header.
fn split_contacts(contacts: &[Contact]) -> (Option<String>, Option<String>) {
    let mut names = Vec::new();
    let mut emails = Vec::new();

    for contact in contacts {
        match (&contact.name, &contact.email) {
            (Some(name), Some(email)) => emails.push(format!("{name} <{email}>")),
            (None, Some(email)) => emails.push(email.clone()),
            (Some(name), None) => names.push(name.clone()),
            (None, None) => {}
        }
    }

    let join = |v: Vec<String>| (!v.is_empty()).then(|| v.join(", "));
    (join(names), join(emails))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn render(doc: &MetadataDocument) -> String {
        String::from_utf8(doc.to_rfc822()).unwrap()
    }

    #[test]
    fn test_minimal_document() {
        let doc = MetadataDocument::new("demo", "0.1.0");
        assert_eq!(
            render(&doc),
            "Metadata-Version: 2.1\nName: demo\nVersion: 0.1.0\n"
        );
    }

    #[test]
    fn test_full_document_order() {
        let mut doc = MetadataDocument::new("demo", "1.0");
        doc.summary = Some("Demo".into());
        doc.keywords = vec!["a".into(), "b".into()];
        doc.project_urls = vec![("Homepage".into(), "https://example.org".into())];
        doc.authors = vec![
            Contact::with_email("Jo", "jo@example.org"),
            Contact::named("Sam"),
        ];
        doc.license = Some("MIT".into());
        doc.classifiers = vec!["Programming Language :: Python".into()];
        doc.requires_python = Some(">=3.8".into());
        doc.requires_dist = vec!["requests>=2".into(), "rich; extra == \"cli\"".into()];
        doc.provides_extra = vec!["cli".into()];
        doc.description_content_type = Some("text/markdown".into());
        doc.description = Some("# Demo\n\nLong text.".into());

        let expected = "Metadata-Version: 2.1\n\
Name: demo\n\
Version: 1.0\n\
Summary: Demo\n\
Keywords: a,b\n\
Project-URL: Homepage, https://example.org\n\
Author: Sam\n\
Author-email: Jo <jo@example.org>\n\
License: MIT\n\
Classifier: Programming Language :: Python\n\
Requires-Python: >=3.8\n\
Requires-Dist: requests>=2\n\
Requires-Dist: rich; extra == \"cli\"\n\
Provides-Extra: cli\n\
Description-Content-Type: text/markdown\n\
\n\
# Demo\n\
\n\
Long text.\n";
        assert_eq!(render(&doc), expected);
    }

    #[test]
    fn test_multiline_value_is_continued() {
        let mut doc = MetadataDocument::new("demo", "1.0");
        doc.license = Some("Line one\nLine two".into());
        let text = render(&doc);
        assert!(text.contains("License: Line one\n        Line two\n"));
    }

    #[test]
    fn test_byte_length_matches_serialization() {
        let mut doc = MetadataDocument::new("démo", "1.0");
        doc.summary = Some("Ünïcödé summary".into());
        let bytes = doc.to_rfc822();
        assert_eq!(bytes.len(), render(&doc).len());
        assert!(bytes.len() > render(&doc).chars().count());
    }

    #[test]
    fn test_email_only_contact() {
        let mut doc = MetadataDocument::new("demo", "1.0");
        doc.maintainers = vec![Contact {
            name: None,
            email: Some("team@example.org".into()),
        }];
        let text = render(&doc);
        assert!(text.contains("Maintainer-email: team@example.org\n"));
        assert!(!text.contains("Maintainer:"));
    }
}
