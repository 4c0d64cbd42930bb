//! Cogito configuration stored as TOML.
//!
//! Lookup order: `--config <path>`, then `$COGITO_CONFIG`, then
//! `<config dir>/cogito/config.toml`.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Environment variable that overrides the default config location.
pub const CONFIG_ENV: &str = "COGITO_CONFIG";

/// Cogito configuration (TOML).
///
/// Missing fields default to the values below.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CogitoConfig {
    /// Kill shell steps after this many seconds. Unset means no timeout.
    pub command_timeout_secs: Option<u64>,

    /// Truncate captured stdout/stderr beyond this many bytes.
    pub output_limit_bytes: usize,

    /// How long the interface shows "Thinking..." before the roadmap appears.
    pub plan_delay_ms: u64,

    pub shell: ShellConfig,

    pub plan: PlanConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ShellConfig {
    /// Shell binary; the step command is appended after `args`.
    pub program: String,
    pub args: Vec<String>,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            program: "sh".to_string(),
            args: vec!["-c".to_string()],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PlanConfig {
    /// Step templates; `{{ project }}` expands to the goal's project token.
    pub steps: Vec<StepTemplate>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StepTemplate {
    pub title: String,
    pub cmd: String,
    #[serde(default)]
    pub desc: String,
}

impl StepTemplate {
    fn new(title: &str, cmd: &str, desc: &str) -> Self {
        Self {
            title: title.to_string(),
            cmd: cmd.to_string(),
            desc: desc.to_string(),
        }
    }
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            steps: vec![
                StepTemplate::new(
                    "Create project directory",
                    "mkdir {{ project }}-project",
                    "A home for your new idea.",
                ),
                StepTemplate::new(
                    "Navigate into directory",
                    "cd {{ project }}-project",
                    "Setting the context for our work.",
                ),
                StepTemplate::new(
                    "Initialize Git repository",
                    "git init",
                    "Setting up version control.",
                ),
                StepTemplate::new(
                    "Check Node Environment",
                    "node -v",
                    "Verifying the runtime.",
                ),
            ],
        }
    }
}

impl Default for CogitoConfig {
    fn default() -> Self {
        Self {
            command_timeout_secs: None,
            output_limit_bytes: 100_000,
            plan_delay_ms: 1_000,
            shell: ShellConfig::default(),
            plan: PlanConfig::default(),
        }
    }
}

impl CogitoConfig {
    pub fn validate(&self) -> Result<()> {
        if self.command_timeout_secs == Some(0) {
            return Err(anyhow!(
                "command_timeout_secs must be > 0 (omit it to disable the timeout)"
            ));
        }
        if self.output_limit_bytes == 0 {
            return Err(anyhow!("output_limit_bytes must be > 0"));
        }
        if self.shell.program.trim().is_empty() {
            return Err(anyhow!("shell.program must be non-empty"));
        }
        if self.plan.steps.is_empty() {
            return Err(anyhow!("plan.steps must contain at least one step"));
        }
        for (idx, step) in self.plan.steps.iter().enumerate() {
            if step.cmd.trim().is_empty() {
                return Err(anyhow!("plan.steps[{idx}].cmd must be non-empty"));
            }
        }
        Ok(())
    }

    pub fn command_timeout(&self) -> Option<Duration> {
        self.command_timeout_secs.map(Duration::from_secs)
    }

    pub fn plan_delay(&self) -> Duration {
        Duration::from_millis(self.plan_delay_ms)
    }
}

/// Resolve the config path from an explicit flag, the environment, or the
/// platform config directory.
pub fn config_path(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }
    if let Some(path) = std::env::var_os(CONFIG_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(path));
    }
    let base = dirs::config_dir().context("no config directory for this platform")?;
    Ok(base.join("cogito").join("config.toml"))
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `CogitoConfig::default()`.
pub fn load_config(path: &Path) -> Result<CogitoConfig> {
    if !path.exists() {
        debug!(path = %path.display(), "config missing, using defaults");
        let cfg = CogitoConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: CogitoConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("validate {}", path.display()))?;
    Ok(cfg)
}

/// Atomically write config to disk (temp file + rename).
pub fn write_config(path: &Path, cfg: &CogitoConfig) -> Result<()> {
    cfg.validate()?;
    let mut buf = toml::to_string_pretty(cfg).context("serialize config toml")?;
    buf.push('\n');
    write_atomic(path, &buf)
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let parent = path
        .parent()
        .with_context(|| format!("config path missing parent {}", path.display()))?;
    fs::create_dir_all(parent).with_context(|| format!("create directory {}", parent.display()))?;
    let tmp_path = path.with_extension("toml.tmp");
    fs::write(&tmp_path, contents)
        .with_context(|| format!("write temp config {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace config {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_missing_returns_default() {
        let temp = tempfile::tempdir().expect("tempdir");
        let cfg = load_config(&temp.path().join("missing.toml")).expect("load");
        assert_eq!(cfg, CogitoConfig::default());
        assert_eq!(cfg.command_timeout(), None);
    }

    #[test]
    fn write_then_load_round_trips() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("nested").join("config.toml");
        let cfg = CogitoConfig {
            command_timeout_secs: Some(30),
            ..CogitoConfig::default()
        };
        write_config(&path, &cfg).expect("write");
        let loaded = load_config(&path).expect("load");
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("config.toml");
        fs::write(&path, "plan_delay_ms = 0\n[shell]\nprogram = \"bash\"\n").expect("write");
        let cfg = load_config(&path).expect("load");
        assert_eq!(cfg.plan_delay_ms, 0);
        assert_eq!(cfg.shell.program, "bash");
        assert_eq!(cfg.shell.args, vec!["-c".to_string()]);
        assert_eq!(cfg.plan.steps.len(), 4);
    }

    #[test]
    fn zero_timeout_is_invalid() {
        let cfg = CogitoConfig {
            command_timeout_secs: Some(0),
            ..CogitoConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn explicit_path_wins() {
        let path = config_path(Some(Path::new("/tmp/cogito.toml"))).expect("path");
        assert_eq!(path, PathBuf::from("/tmp/cogito.toml"));
    }
}
