//! CLI tests for `cogito run` and `cogito plan`.
//!
//! Spawns the cogito binary with a temp config and verifies exit codes and
//! feed output.

use std::path::Path;
use std::process::{Command, Output};

use cogito::exit_codes;
use cogito::io::config::{CogitoConfig, PlanConfig, StepTemplate, write_config};

fn template(cmd: &str) -> StepTemplate {
    StepTemplate {
        title: cmd.to_string(),
        cmd: cmd.to_string(),
        desc: String::new(),
    }
}

fn write_plan(path: &Path, cmds: &[&str]) {
    let cfg = CogitoConfig {
        plan: PlanConfig {
            steps: cmds.iter().map(|cmd| template(cmd)).collect(),
        },
        ..CogitoConfig::default()
    };
    write_config(path, &cfg).expect("write config");
}

fn cogito(config: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_cogito"))
        .arg("--config")
        .arg(config)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("spawn cogito")
}

#[test]
fn run_completes_every_step() {
    let temp = tempfile::tempdir().expect("tempdir");
    let config = temp.path().join("config.toml");
    write_plan(
        &config,
        &["mkdir {{ project }}-project", "cd {{ project }}-project", "pwd"],
    );
    let cwd = temp.path().join("work");
    std::fs::create_dir(&cwd).expect("mkdir work");
    let cwd = cwd.canonicalize().expect("canonicalize");

    let output = cogito(
        &config,
        &["run", "build", "a", "demo", "--cwd", &cwd.display().to_string()],
    );

    assert_eq!(output.status.code(), Some(exit_codes::OK));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let project = cwd.join("demo-project");
    assert!(stdout.contains("[Cogito] Received your thought: \"build a demo\""));
    assert!(stdout.contains(&format!(
        "[Success] Changed directory to {}",
        project.display()
    )));
    assert!(stdout.contains(&format!("[Success] {}", project.display())));
}

#[test]
fn run_halts_on_failed_step() {
    let temp = tempfile::tempdir().expect("tempdir");
    let config = temp.path().join("config.toml");
    write_plan(&config, &["cd nowhere", "echo unreachable"]);

    let output = cogito(
        &config,
        &["run", "x", "--cwd", &temp.path().display().to_string()],
    );

    assert_eq!(output.status.code(), Some(exit_codes::HALTED));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("[Error] cd: no such file or directory: nowhere"));
    assert!(!stdout.contains("unreachable"));
}

#[test]
fn plan_prints_pending_roadmap_json() {
    let temp = tempfile::tempdir().expect("tempdir");
    let config = temp.path().join("missing.toml");

    let output = cogito(&config, &["plan", "start", "my", "blog"]);

    assert_eq!(output.status.code(), Some(exit_codes::OK));
    let steps: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(steps[0]["cmd"], "mkdir blog-project");
    assert_eq!(steps[1]["cmd"], "cd blog-project");
    assert_eq!(steps[3]["id"], 4);
    assert_eq!(steps[3]["status"], "pending");
}

#[test]
fn init_config_refuses_to_overwrite() {
    let temp = tempfile::tempdir().expect("tempdir");
    let config = temp.path().join("cfg").join("config.toml");

    let first = cogito(&config, &["init-config"]);
    assert_eq!(first.status.code(), Some(exit_codes::OK));
    assert!(config.exists());

    let second = cogito(&config, &["init-config"]);
    assert_eq!(second.status.code(), Some(exit_codes::INVALID));
}
