//! Roadmap planning from a free-text goal.
//!
//! [`TemplatePlanner`] is a stand-in for real goal understanding: it renders a
//! fixed list of step templates, substituting a project token derived from the
//! goal's last word.

use anyhow::{Context, Result, bail};
use minijinja::{Environment, context};
use tracing::debug;

use crate::core::types::StepDraft;
use crate::io::config::{PlanConfig, StepTemplate};

/// Token used when the goal's last word has nothing left after stripping.
pub const DEFAULT_PROJECT: &str = "new-project";

const STRIPPED_CHARS: &[char] = &[
    '.', ',', '/', '#', '!', '$', '%', '^', '&', '*', ';', ':', '{', '}', '=', '-', '_', '`', '~',
    '(', ')',
];

/// Produces the ordered steps for a goal.
pub trait Planner: Send + Sync {
    fn plan(&self, goal: &str) -> Result<Vec<StepDraft>>;
}

/// Planner that renders configured step templates.
pub struct TemplatePlanner {
    templates: Vec<StepTemplate>,
}

impl TemplatePlanner {
    pub fn new(config: &PlanConfig) -> Self {
        Self {
            templates: config.steps.clone(),
        }
    }
}

impl Default for TemplatePlanner {
    fn default() -> Self {
        Self::new(&PlanConfig::default())
    }
}

impl Planner for TemplatePlanner {
    fn plan(&self, goal: &str) -> Result<Vec<StepDraft>> {
        let goal = goal.trim();
        if goal.is_empty() {
            bail!("goal is empty");
        }
        let project = project_name(goal);
        debug!(project = %project, steps = self.templates.len(), "rendering roadmap");

        let env = Environment::new();
        self.templates
            .iter()
            .enumerate()
            .map(|(idx, template)| {
                let render = |field: &str, source: &str| {
                    env.render_str(source, context! { project => &project, goal => goal })
                        .with_context(|| format!("render plan.steps[{idx}].{field}"))
                };
                Ok(StepDraft {
                    title: render("title", &template.title)?,
                    cmd: render("cmd", &template.cmd)?,
                    desc: render("desc", &template.desc)?,
                })
            })
            .collect()
    }
}

/// Derive the project token from the last space-separated word of `goal`.
pub fn project_name(goal: &str) -> String {
    let last = goal.trim().split(' ').next_back().unwrap_or_default();
    let cleaned: String = last.chars().filter(|c| !STRIPPED_CHARS.contains(c)).collect();
    if cleaned.is_empty() {
        DEFAULT_PROJECT.to_string()
    } else {
        cleaned
    }
}
