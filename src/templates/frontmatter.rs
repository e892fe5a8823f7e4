//! YAML frontmatter parsing for agent and skill templates.
//!
//! ```text
//! ---
//! name: executor
//! description: Implements exactly one task at a time.
//! tools: [Read, Write, Bash]
//! ---
//!
//! # Executor
//! ...
//! ```

use crate::error::{Result, SuperbeadsError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Metadata from a template's frontmatter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateMeta {
    pub name: String,

    #[serde(default)]
    pub description: String,

    /// Tools the agent may use (agents only).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<String>,

    /// Preferred model (agents only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Owning pack (skills only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pack: Option<String>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

/// A template split into metadata and Markdown body.
#[derive(Debug, Clone)]
pub struct TemplateDoc {
    pub meta: TemplateMeta,
    pub body: String,
}

/// Parse a Markdown document with a leading `---` frontmatter block.
///
/// LF and CRLF line endings are both accepted.
pub fn parse_frontmatter(content: &str) -> Result<TemplateDoc> {
    let normalized = content.replace("\r\n", "\n");

    let rest = normalized
        .strip_prefix("---\n")
        .ok_or_else(|| {
            SuperbeadsError::UserError(
                "template must start with a '---' frontmatter delimiter".to_string(),
            )
        })?;

    let (yaml, body) = if let Some(body) = rest.strip_prefix("---") {
        ("", body)
    } else {
        let end = rest.find("\n---").ok_or_else(|| {
            SuperbeadsError::UserError(
                "template is missing the closing '---' frontmatter delimiter".to_string(),
            )
        })?;
        (&rest[..end], &rest[end + 4..])
    };

    let meta: TemplateMeta = serde_yaml::from_str(yaml).map_err(|e| {
        SuperbeadsError::UserError(format!("failed to parse template frontmatter: {}", e))
    })?;

    if meta.name.trim().is_empty() {
        return Err(SuperbeadsError::UserError(
            "template frontmatter has an empty 'name'".to_string(),
        ));
    }

    let body = body.strip_prefix('\n').unwrap_or(body).to_string();
    Ok(TemplateDoc { meta, body })
}
