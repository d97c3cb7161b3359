//! Loads project identity and metadata from `pyproject.toml`.
//!
//! Only the `[project]` table is read. Dynamic metadata is not resolved;
//! a project that declares `version` as dynamic is rejected.

use crate::MetadataDocument;
use crate::ProjectIdentity;
use crate::Result;
use crate::SdistError;
use crate::metadata::Contact;
use serde::Deserialize;
use std::path::Path;

/// File name of the project configuration at the project root.
pub const PYPROJECT_FILE: &str = "pyproject.toml";

/// Identity plus full metadata for one project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectMetadata {
    /// Name and version, validated for use in paths.
    pub identity: ProjectIdentity,
    /// Document embedded as `PKG-INFO`.
    pub document: MetadataDocument,
}

#[derive(Debug, Deserialize)]
struct PyProjectFile {
    project: Option<ProjectTable>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct ProjectTable {
    name: Option<String>,
    version: Option<String>,
    description: Option<String>,
    readme: Option<Readme>,
    requires_python: Option<String>,
    license: Option<License>,
    #[serde(default)]
    authors: Vec<ContactTable>,
    #[serde(default)]
    maintainers: Vec<ContactTable>,
    #[serde(default)]
    keywords: Vec<String>,
    #[serde(default)]
    classifiers: Vec<String>,
    #[serde(default)]
    urls: toml::Table,
    #[serde(default)]
    dependencies: Vec<String>,
    #[serde(default)]
    optional_dependencies: toml::Table,
    #[serde(default)]
    dynamic: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Readme {
    Path(String),
    Table {
        file: Option<String>,
        text: Option<String>,
        #[serde(rename = "content-type")]
        content_type: Option<String>,
    },
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum License {
    Expression(String),
    Table {
        text: Option<String>,
        file: Option<String>,
    },
}

#[derive(Debug, Deserialize)]
struct ContactTable {
    name: Option<String>,
    email: Option<String>,
}

/// Reads `<root>/pyproject.toml` and resolves the project's metadata.
///
/// # Errors
///
/// Returns an error if the file cannot be read, is not valid TOML, or does
/// not describe a project with a static name and version.
///
/// # Examples
///
/// ```no_run
/// use sdist_core::pyproject::load_project;
/// use std::path::Path;
///
/// let project = load_project(Path::new("."))?;
/// println!("{}", project.identity.archive_name());
/// # Ok::<(), sdist_core::SdistError>(())
/// ```
pub fn load_project(root: &Path) -> Result<ProjectMetadata> {
    let path = root.join(PYPROJECT_FILE);
    let text = std::fs::read_to_string(&path).map_err(|e| SdistError::Configuration {
        reason: format!("cannot read {}: {e}", path.display()),
    })?;
    parse_project(&text, root)
}

/// Resolves project metadata from `pyproject.toml` text.
///
/// `root` is used to resolve `readme` and `license` files.
///
/// # Errors
///
/// Same as [`load_project`], minus the initial read.
pub fn parse_project(text: &str, root: &Path) -> Result<ProjectMetadata> {
    let file: PyProjectFile = toml::from_str(text)?;
    let project = file.project.ok_or_else(|| configuration("missing [project] table"))?;

    let name = project
        .name
        .ok_or_else(|| configuration("[project] is missing required field 'name'"))?;
    if project.dynamic.iter().any(|f| f == "name") {
        return Err(configuration("'name' cannot be dynamic"));
    }
    let version = match project.version {
        Some(version) => version,
        None if project.dynamic.iter().any(|f| f == "version") => {
            return Err(configuration(
                "dynamic 'version' is not supported; set [project].version",
            ));
        }
        None => return Err(configuration("[project] is missing required field 'version'")),
    };

    let identity = ProjectIdentity::new(name.clone(), version.clone())?;
    let mut document = MetadataDocument::new(name, version);

    document.summary = project.description;
    document.keywords = project.keywords;
    document.classifiers = project.classifiers;
    document.requires_python = project.requires_python;
    document.authors = project.authors.into_iter().map(Contact::from).collect();
    document.maintainers = project.maintainers.into_iter().map(Contact::from).collect();
    document.project_urls = ordered_entries::<String>(project.urls, "urls")?;
    document.license = project
        .license
        .map(|license| resolve_license(license, root))
        .transpose()?;

    if let Some(readme) = project.readme {
        let (body, content_type) = resolve_readme(readme, root)?;
        document.description = Some(body);
        document.description_content_type = Some(content_type);
    }

    document.requires_dist = project.dependencies;
    let extras = ordered_entries::<Vec<String>>(
        project.optional_dependencies,
        "optional-dependencies",
    )?;
    for (extra, requirements) in extras {
        for requirement in requirements {
            document
                .requires_dist
                .push(with_extra_marker(&requirement, &extra));
        }
        document.provides_extra.push(extra);
    }

    Ok(ProjectMetadata { identity, document })
}

/// Decodes every value of `table` as `T`, keeping declaration order.
fn ordered_entries<T>(table: toml::Table, field: &str) -> Result<Vec<(String, T)>>
where
    T: serde::de::DeserializeOwned,
{
    table
        .into_iter()
        .map(|(key, value)| {
            let decoded = value
                .try_into()
                .map_err(|e| configuration(format!("[project].{field}.{key}: {e}")))?;
            Ok((key, decoded))
        })
        .collect()
}

impl From<ContactTable> for Contact {
    fn from(table: ContactTable) -> Self {
        Self {
            name: table.name,
            email: table.email,
        }
    }
}

fn resolve_license(license: License, root: &Path) -> Result<String> {
    match license {
        License::Expression(expr) => Ok(expr),
        License::Table {
            text: Some(text),
            file: None,
        } => Ok(text),
        License::Table {
            text: None,
            file: Some(file),
        } => read_project_file(root, &file, "license"),
        License::Table { .. } => Err(configuration(
            "[project].license must set exactly one of 'text' or 'file'",
        )),
    }
}

fn resolve_readme(readme: Readme, root: &Path) -> Result<(String, String)> {
    match readme {
        Readme::Path(file) => {
            let content_type = content_type_for(&file)?;
            Ok((read_project_file(root, &file, "readme")?, content_type))
        }
        Readme::Table {
            file,
            text,
            content_type,
        } => {
            let body = match (file.as_deref(), text) {
                (Some(file), None) => read_project_file(root, file, "readme")?,
                (None, Some(text)) => text,
                _ => {
                    return Err(configuration(
                        "[project].readme must set exactly one of 'file' or 'text'",
                    ));
                }
            };
            let content_type = match (content_type, file.as_deref()) {
                (Some(ct), _) => ct,
                (None, Some(file)) => content_type_for(file)?,
                (None, None) => {
                    return Err(configuration(
                        "[project].readme.content-type is required with inline text",
                    ));
                }
            };
            Ok((body, content_type))
        }
    }
}

fn content_type_for(file: &str) -> Result<String> {
    let lower = file.to_ascii_lowercase();
    let content_type = if lower.ends_with(".md") {
        "text/markdown"
    } else if lower.ends_with(".rst") {
        "text/x-rst"
    } else if lower.ends_with(".txt") {
        "text/plain"
    } else {
        return Err(configuration(format!(
            "cannot infer readme content type for {file:?}; set readme.content-type"
        )));
    };
    Ok(content_type.to_string())
}

fn read_project_file(root: &Path, file: &str, field: &str) -> Result<String> {
    let path = root.join(file);
    std::fs::read_to_string(&path).map_err(|e| SdistError::Configuration {
        reason: format!("cannot read {field} file {}: {e}", path.display()),
    })
}

/// Appends an `extra == "<name>"` marker to a requirement string.
fn with_extra_marker(requirement: &str, extra: &str) -> String {
    match requirement.split_once(';') {
        Some((req, marker)) => {
            format!("{}; ({}) and extra == \"{extra}\"", req.trim(), marker.trim())
        }
        None => format!("{}; extra == \"{extra}\"", requirement.trim()),
    }
}

fn configuration(reason: impl Into<String>) -> SdistError {
    SdistError::Configuration {
        reason: reason.into(),
    }
}
