//! Manifest object model
//!
//! Typed Kubernetes objects are converted to YAML values once and wrapped
//! in a [`Document`], which carries the comment header printed above the
//! object. Multi-document files are joined with `---` separators.

use std::collections::BTreeMap;

use ingshift_model::{ArtifactCategory, GeneratedArtifact};
use serde::Serialize;
use serde_yaml::Value;

use crate::error::{Result, SynthError};

/// `metadata` block
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjectMeta {
    /// Object name
    pub name: String,
    /// Namespace; cluster-scoped objects have none
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    /// Annotations
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,
}

impl ObjectMeta {
    /// Cluster-scoped metadata
    #[must_use]
    pub fn cluster(name: &str) -> Self {
        Self {
            name: name.to_string(),
            namespace: None,
            annotations: BTreeMap::new(),
        }
    }

    /// Namespaced metadata
    #[must_use]
    pub fn namespaced(name: &str, namespace: &str) -> Self {
        Self {
            namespace: Some(namespace.to_string()),
            ..Self::cluster(name)
        }
    }

    /// Add an annotation
    #[inline]
    #[must_use]
    pub fn with_annotation(mut self, key: &str, value: &str) -> Self {
        self.annotations.insert(key.to_string(), value.to_string());
        self
    }
}

/// A Kubernetes object with a typed `spec`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Object<S> {
    /// `apiVersion`
    pub api_version: &'static str,
    /// `kind`
    pub kind: &'static str,
    /// `metadata`
    pub metadata: ObjectMeta,
    /// `spec`
    pub spec: S,
}

impl<S: Serialize> Object<S> {
    /// Assemble an object
    #[inline]
    pub fn new(api_version: &'static str, kind: &'static str, metadata: ObjectMeta, spec: S) -> Self {
        Self {
            api_version,
            kind,
            metadata,
            spec,
        }
    }

    /// Convert into a document with an empty header
    pub fn into_document(self) -> serde_yaml::Result<Document> {
        Document::new(&self)
    }
}

/// Comment block placed inside the body, after a run of lines
#[derive(Debug, Clone, PartialEq, Eq)]
struct InlineComment {
    anchor: Vec<String>,
    lines: Vec<String>,
}

/// One YAML document plus its comment header
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    comments: Vec<String>,
    notes: Vec<String>,
    inline: Vec<InlineComment>,
    body: Value,
}

impl Document {
    /// Serialize `object` into a document
    pub fn new<T: Serialize>(object: &T) -> serde_yaml::Result<Self> {
        Ok(Self {
            comments: Vec::new(),
            notes: Vec::new(),
            inline: Vec::new(),
            body: serde_yaml::to_value(object)?,
        })
    }

    /// Add a plain comment line
    #[inline]
    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comments.push(comment.into());
        self
    }

    /// Add a `# NOTE:` line
    #[inline]
    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Add several `# NOTE:` lines
    #[must_use]
    pub fn with_notes<I>(mut self, notes: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        self.notes.extend(notes);
        self
    }

    /// Insert comment `lines` after every run of body lines equal to `anchor`
    ///
    /// Lines are compared trimmed. The block is indented to the enclosing
    /// sequence item of the last anchor line.
    #[must_use]
    pub fn with_inline_comment(mut self, anchor: Vec<String>, lines: Vec<String>) -> Self {
        if !anchor.is_empty() {
            self.inline.push(InlineComment { anchor, lines });
        }
        self
    }

    /// Header notes
    #[inline]
    #[must_use]
    pub fn notes(&self) -> &[String] {
        &self.notes
    }

    /// Serialized object
    #[inline]
    #[must_use]
    pub fn body(&self) -> &Value {
        &self.body
    }

    /// Object kind, if the body has one
    #[must_use]
    pub fn kind(&self) -> Option<&str> {
        self.body.get("kind").and_then(Value::as_str)
    }

    /// Object name, if the body has one
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.body
            .get("metadata")
            .and_then(|m| m.get("name"))
            .and_then(Value::as_str)
    }

    /// Header followed by the YAML body
    pub fn render(&self) -> serde_yaml::Result<String> {
        let mut out = String::new();
        for comment in &self.comments {
            push_comment(&mut out, "# ", comment);
        }
        for note in &self.notes {
            push_comment(&mut out, "# NOTE: ", note);
        }
        let body = serde_yaml::to_string(&self.body)?;
        if self.inline.is_empty() {
            out.push_str(&body);
            return Ok(out);
        }
        let mut seen: Vec<&str> = Vec::new();
        for line in body.lines() {
            out.push_str(line);
            out.push('\n');
            seen.push(line.trim());
            for block in &self.inline {
                let n = block.anchor.len();
                let matched = seen.len() >= n
                    && seen[seen.len() - n..].iter().zip(&block.anchor).all(|(a, b)| a == b);
                if matched {
                    let width = line.len() - line.trim_start().len();
                    let indent = " ".repeat(width.saturating_sub(2));
                    for text in &block.lines {
                        out.push_str(&indent);
                        out.push_str("# ");
                        out.push_str(text);
                        out.push('\n');
                    }
                }
            }
        }
        Ok(out)
    }
}

fn push_comment(out: &mut String, lead: &str, text: &str) {
    for (i, line) in text.lines().enumerate() {
        out.push_str(if i == 0 { lead } else { "#   " });
        out.push_str(line);
        out.push('\n');
    }
}

/// Render documents as one multi-document stream
pub fn render_stream(documents: &[Document]) -> serde_yaml::Result<String> {
    let rendered = documents
        .iter()
        .map(Document::render)
        .collect::<serde_yaml::Result<Vec<_>>>()?;
    Ok(rendered.join("---\n"))
}

/// Render documents into an artifact at `path`
pub fn yaml_artifact(
    path: String,
    category: ArtifactCategory,
    description: String,
    documents: &[Document],
) -> Result<GeneratedArtifact> {
    let content = render_stream(documents).map_err(|e| SynthError::render(&path, e))?;
    Ok(GeneratedArtifact::new(path, category, description, content))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[derive(Serialize)]
    struct Spec {
        replicas: u32,
    }

    fn sample() -> Document {
        Object::new("apps/v1", "Deployment", ObjectMeta::namespaced("web", "shop"), Spec { replicas: 2 })
            .into_document()
            .unwrap()
    }

    #[test]
    fn renders_header_then_body() {
        let doc = sample()
            .with_comment("Deployment for web")
            .with_note("replicas copied from the source");
        assert_eq!(
            doc.render().unwrap(),
            "# Deployment for web\n\
             # NOTE: replicas copied from the source\n\
             apiVersion: apps/v1\n\
             kind: Deployment\n\
             metadata:\n  name: web\n  namespace: shop\n\
             spec:\n  replicas: 2\n"
        );
    }

    #[test]
    fn multi_line_note_continues() {
        let doc = sample().with_note("first\nsecond");
        assert!(doc.render().unwrap().starts_with("# NOTE: first\n#   second\n"));
    }

    #[test]
    fn inline_comment_follows_anchor() {
        #[derive(Serialize)]
        struct Refs {
            refs: Vec<Spec>,
        }
        let doc = Document::new(&Refs {
            refs: vec![Spec { replicas: 1 }, Spec { replicas: 2 }],
        })
        .unwrap()
        .with_inline_comment(vec!["- replicas: 2".into()], vec!["- replicas: 3".into()]);
        assert_eq!(
            doc.render().unwrap(),
            "refs:\n- replicas: 1\n- replicas: 2\n# - replicas: 3\n"
        );
    }

    #[test]
    fn stream_joins_with_separator() {
        let text = render_stream(&[sample(), sample()]).unwrap();
        assert_eq!(text.matches("---\n").count(), 1);
        assert_eq!(text.matches("kind: Deployment").count(), 2);
    }

    #[test]
    fn cluster_meta_omits_namespace() {
        let doc = Object::new("v1", "Namespace", ObjectMeta::cluster("infra"), Spec { replicas: 0 })
            .into_document()
            .unwrap();
        assert!(!doc.render().unwrap().contains("namespace:"));
        assert_eq!(doc.kind(), Some("Namespace"));
        assert_eq!(doc.name(), Some("infra"));
    }
}
