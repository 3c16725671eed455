//! Project records and request bodies, with validation.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectLink {
    pub label: String,
    pub url: String,
}

/// Full record, as returned by `GET /api/projects/:slug`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: i64,
    pub slug: String,
    pub title: String,
    pub summary: String,
    pub content: String,
    pub cover_image: Option<String>,
    pub featured: bool,
    pub tags: Vec<String>,
    pub technologies: Vec<String>,
    pub links: Vec<ProjectLink>,
    pub created_at: String,
    pub updated_at: String,
}

/// List view, without long-form content.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSummary {
    pub id: i64,
    pub slug: String,
    pub title: String,
    pub summary: String,
    pub cover_image: Option<String>,
    pub featured: bool,
    pub tags: Vec<String>,
    pub technologies: Vec<String>,
    pub links: Vec<ProjectLink>,
}

impl From<Project> for ProjectSummary {
    fn from(p: Project) -> Self {
        Self {
            id: p.id,
            slug: p.slug,
            title: p.title,
            summary: p.summary,
            cover_image: p.cover_image,
            featured: p.featured,
            tags: p.tags,
            technologies: p.technologies,
            links: p.links,
        }
    }
}

/// Body of `POST /api/projects`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewProject {
    pub slug: String,
    pub title: String,
    pub summary: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub links: Vec<ProjectLink>,
}

/// Body of `PATCH /api/projects/:id`; absent fields are left unchanged.
/// `coverImage: null` is indistinguishable from absence and keeps the image.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ProjectPatch {
    pub slug: Option<String>,
    pub title: Option<String>,
    pub summary: Option<String>,
    pub content: Option<String>,
    pub cover_image: Option<String>,
    pub featured: Option<bool>,
    pub tags: Option<Vec<String>>,
    pub technologies: Option<Vec<String>>,
    pub links: Option<Vec<ProjectLink>>,
}

impl ProjectPatch {
    pub fn apply(self, project: &mut Project) {
        if let Some(v) = self.slug {
            project.slug = v;
        }
        if let Some(v) = self.title {
            project.title = v;
        }
        if let Some(v) = self.summary {
            project.summary = v;
        }
        if let Some(v) = self.content {
            project.content = v;
        }
        if let Some(v) = self.cover_image {
            project.cover_image = Some(v);
        }
        if let Some(v) = self.featured {
            project.featured = v;
        }
        if let Some(v) = self.tags {
            project.tags = v;
        }
        if let Some(v) = self.technologies {
            project.technologies = v;
        }
        if let Some(v) = self.links {
            project.links = v;
        }
    }
}

// ───────────────────────────────────────── validation ────────

const MAX_TITLE: usize = 200;
const MAX_SUMMARY: usize = 500;

fn slug_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").expect("slug regex"))
}

fn is_link_url(url: &str) -> bool {
    url.starts_with("https://") || url.starts_with("http://") || url.starts_with('/')
}

/// Field-level checks shared by create and update.  Returns every problem
/// found, joined, or `Ok` when the record is valid.
pub fn validate_fields(
    slug: &str,
    title: &str,
    summary: &str,
    tags: &[String],
    technologies: &[String],
    links: &[ProjectLink],
) -> Result<(), String> {
    let mut problems = Vec::new();
    if !slug_re().is_match(slug) {
        problems.push("slug must be lowercase words separated by hyphens".to_string());
    }
    let title_len = title.trim().chars().count();
    if title_len == 0 || title_len > MAX_TITLE {
        problems.push(format!("title must be 1-{MAX_TITLE} characters"));
    }
    let summary_len = summary.trim().chars().count();
    if summary_len == 0 || summary_len > MAX_SUMMARY {
        problems.push(format!("summary must be 1-{MAX_SUMMARY} characters"));
    }
    if tags.iter().chain(technologies).any(|t| t.trim().is_empty()) {
        problems.push("tags and technologies must not be blank".to_string());
    }
    for link in links {
        if link.label.trim().is_empty() || !is_link_url(&link.url) {
            problems.push(format!("invalid link `{}`", link.url));
        }
    }
    if problems.is_empty() {
        Ok(())
    } else {
        Err(problems.join("; "))
    }
}

impl NewProject {
    pub fn validate(&self) -> Result<(), String> {
        validate_fields(
            &self.slug,
            &self.title,
            &self.summary,
            &self.tags,
            &self.technologies,
            &self.links,
        )
    }
}

impl Project {
    pub fn validate(&self) -> Result<(), String> {
        validate_fields(
            &self.slug,
            &self.title,
            &self.summary,
            &self.tags,
            &self.technologies,
            &self.links,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_project() -> NewProject {
        NewProject {
            slug: "ray-tracer".into(),
            title: "Ray tracer".into(),
            summary: "A weekend ray tracer".into(),
            content: String::new(),
            cover_image: None,
            featured: false,
            tags: vec!["graphics".into()],
            technologies: vec!["rust".into()],
            links: vec![ProjectLink {
                label: "Source".into(),
                url: "https://example.com/rt".into(),
            }],
        }
    }

    #[test]
    fn valid_project_passes() {
        assert!(new_project().validate().is_ok());
    }

    #[test]
    fn collects_every_problem() {
        let mut p = new_project();
        p.slug = "Bad Slug".into();
        p.title = "   ".into();
        p.links[0].url = "javascript:alert(1)".into();
        let err = p.validate().unwrap_err();
        assert!(err.contains("slug"));
        assert!(err.contains("title"));
        assert!(err.contains("invalid link"));
    }

    #[test]
    fn body_uses_camel_case_and_rejects_unknown_fields() {
        let ok: NewProject = serde_json::from_str(
            r#"{"slug":"a","title":"A","summary":"s","coverImage":"/c.webp","featured":true}"#,
        )
        .unwrap();
        assert_eq!(ok.cover_image.as_deref(), Some("/c.webp"));
        assert!(ok.featured);
        assert!(serde_json::from_str::<NewProject>(r#"{"slug":"a","title":"A","summary":"s","x":1}"#).is_err());
    }

    #[test]
    fn patch_only_touches_given_fields() {
        let mut p = Project {
            id: 1,
            slug: "a".into(),
            title: "A".into(),
            summary: "s".into(),
            content: "body".into(),
            cover_image: Some("/c.webp".into()),
            featured: false,
            tags: vec![],
            technologies: vec![],
            links: vec![],
            created_at: String::new(),
            updated_at: String::new(),
        };
        let patch: ProjectPatch = serde_json::from_str(r#"{"title":"B","featured":true}"#).unwrap();
        patch.apply(&mut p);
        assert_eq!(p.title, "B");
        assert!(p.featured);
        assert_eq!(p.content, "body");
        assert_eq!(p.cover_image.as_deref(), Some("/c.webp"));
    }
}
