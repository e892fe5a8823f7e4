//! Embedded agent, skill and project templates.
//!
//! Templates ship inside the binary so `init`, `pack add` and `install` work
//! without a separate data directory.

mod frontmatter;
mod render;

pub use frontmatter::{TemplateDoc, TemplateMeta, parse_frontmatter};
pub use render::{RenderError, render, vars};

/// A Markdown template compiled into the binary.
#[derive(Debug, Clone, Copy)]
pub struct EmbeddedTemplate {
    /// File name the template is written as (e.g. `executor.md`).
    pub file_name: &'static str,
    pub content: &'static str,
}

impl EmbeddedTemplate {
    /// Template name without the `.md` extension.
    pub fn stem(&self) -> &'static str {
        self.file_name.strip_suffix(".md").unwrap_or(self.file_name)
    }

    pub fn parse(&self) -> crate::error::Result<TemplateDoc> {
        parse_frontmatter(self.content)
    }
}

macro_rules! embed {
    ($file_name:literal, $path:literal) => {
        EmbeddedTemplate {
            file_name: $file_name,
            content: include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/templates/", $path)),
        }
    };
}

/// `CLAUDE.md` skeleton; rendered with `project_name` and `packs`.
pub const CLAUDE_MD: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/templates/CLAUDE.md"));

/// The four core personas installed by `init`.
pub const CORE_AGENTS: &[EmbeddedTemplate] = &[
    embed!("strategist.md", "agents/strategist.md"),
    embed!("executor.md", "agents/executor.md"),
    embed!("specialist.md", "agents/specialist.md"),
    embed!("critic.md", "agents/critic.md"),
];

pub const IOS_AGENTS: &[EmbeddedTemplate] = &[embed!("ios-expert.md", "packs/ios/agents/ios-expert.md")];
pub const IOS_SKILLS: &[EmbeddedTemplate] = &[
    embed!("swiftui-view.md", "packs/ios/skills/swiftui-view.md"),
    embed!("xcode-testing.md", "packs/ios/skills/xcode-testing.md"),
];

pub const PYTHON_AGENTS: &[EmbeddedTemplate] =
    &[embed!("python-expert.md", "packs/python/agents/python-expert.md")];
pub const PYTHON_SKILLS: &[EmbeddedTemplate] = &[
    embed!("pytest-testing.md", "packs/python/skills/pytest-testing.md"),
    embed!("typing.md", "packs/python/skills/typing.md"),
];

pub const WEB_AGENTS: &[EmbeddedTemplate] = &[embed!("web-expert.md", "packs/web/agents/web-expert.md")];
pub const WEB_SKILLS: &[EmbeddedTemplate] = &[
    embed!("react-component.md", "packs/web/skills/react-component.md"),
    embed!("accessibility.md", "packs/web/skills/accessibility.md"),
];

pub const DESIGN_AGENTS: &[EmbeddedTemplate] =
    &[embed!("design-expert.md", "packs/design/agents/design-expert.md")];
pub const DESIGN_SKILLS: &[EmbeddedTemplate] =
    &[embed!("design-review.md", "packs/design/skills/design-review.md")];

pub const PM_AGENTS: &[EmbeddedTemplate] =
    &[embed!("product-manager.md", "packs/pm/agents/product-manager.md")];
pub const PM_SKILLS: &[EmbeddedTemplate] = &[
    embed!("sprint-planning.md", "packs/pm/skills/sprint-planning.md"),
    embed!("task-sizing.md", "packs/pm/skills/task-sizing.md"),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packs::PACKS;

    #[test]
    fn core_agents_parse_and_match_file_names() {
        for template in CORE_AGENTS {
            let doc = template.parse().unwrap();
            assert_eq!(doc.meta.name, template.stem());
            assert!(!doc.meta.description.is_empty());
            assert!(!doc.meta.tools.is_empty(), "{} lists no tools", template.file_name);
        }
    }

    #[test]
    fn pack_skills_declare_their_pack() {
        for pack in PACKS {
            for skill in pack.skills {
                let doc = skill.parse().unwrap();
                assert_eq!(doc.meta.name, skill.stem());
                assert_eq!(doc.meta.pack.as_deref(), Some(pack.name));
            }
            for agent in pack.agents {
                assert_eq!(agent.parse().unwrap().meta.name, agent.stem());
            }
        }
    }

    #[test]
    fn claude_md_renders_with_project_vars() {
        let out = render(CLAUDE_MD, &vars([("project_name", "shop"), ("packs", "web")])).unwrap();
        assert!(out.starts_with("# shop"));
        assert!(out.contains("(web)"));
    }
}
