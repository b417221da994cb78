#![allow(clippy::expect_used, clippy::unwrap_used, missing_docs)]

use std::fs;
use std::path::Path;
use std::process::{Command, Output, Stdio};

use anyhow::{Result, anyhow};
use assert_cmd::cargo::CommandCargoExt;
use serde_json::{Value, json};
use tempfile::TempDir;

struct Cli {
    temp: TempDir,
}

impl Cli {
    fn new() -> Result<Self> {
        Ok(Self {
            temp: TempDir::with_prefix("pastebar-cli-")?,
        })
    }

    fn path(&self) -> &Path {
        self.temp.path()
    }

    fn config(&self) -> std::path::PathBuf {
        self.path().join("settings.toml")
    }

    fn command(&self, args: &[&str]) -> Result<Command> {
        let mut cmd = Command::cargo_bin("pastebar")?;
        cmd.arg("--config")
            .arg(self.config())
            .args(args)
            .env("XDG_DATA_HOME", self.path().join("data-home"))
            .env_remove("RUST_LOG")
            .stdin(Stdio::null());
        Ok(cmd)
    }

    fn run(&self, args: &[&str]) -> Result<Output> {
        Ok(self.command(args)?.output()?)
    }

    fn json(&self, args: &[&str]) -> Result<Value> {
        let output = self.run(args)?;
        if !output.status.success() {
            return Err(anyhow!(
                "pastebar {args:?} failed: {}",
                String::from_utf8_lossy(&output.stderr)
            ));
        }
        Ok(serde_json::from_slice(&output.stdout)?)
    }
}

#[test]
fn preview_truncates_long_text() -> Result<()> {
    let cli = Cli::new()?;
    let text = "x".repeat(70);
    let output = cli.json(&["preview", "--text", &text])?;

    assert_eq!(output["preview"]["text"], format!("{}...", "x".repeat(60)));
    assert_eq!(output["preview"]["extraChars"], 10);
    Ok(())
}

#[test]
fn navigate_reads_snapshot_file() -> Result<()> {
    let cli = Cli::new()?;
    let snapshot = cli.path().join("snapshot.json");
    fs::write(
        &snapshot,
        serde_json::to_string(&json!({
            "active": { "id": "tab-1", "data": { "type": "Tab" } },
            "collisionRect": { "top": 0.0, "left": 200.0, "width": 80.0, "height": 30.0 },
            "droppableRects": {
                "tab-0": { "top": 0.0, "left": 100.0, "width": 80.0, "height": 30.0 }
            },
            "droppableContainers": [
                { "id": "tab-0", "rect": { "top": 0.0, "left": 100.0, "width": 80.0, "height": 30.0 } }
            ]
        }))?,
    )?;

    let snapshot = snapshot.to_string_lossy().into_owned();
    let output = cli.json(&["navigate", "--key", "ArrowLeft", "--snapshot", &snapshot])?;
    assert_eq!(output["preventDefault"], true);
    assert_eq!(output["coordinate"], json!({ "x": 100.0, "y": 0.0 }));

    let output = cli.json(&["navigate", "--key", "ArrowRight", "--snapshot", &snapshot])?;
    assert_eq!(output["coordinate"], Value::Null);
    Ok(())
}

#[test]
fn settings_changes_persist_and_drive_capture() -> Result<()> {
    let cli = Cli::new()?;
    assert!(!cli.config().exists());

    let output = cli.json(&["settings", "set", "isExclusionListEnabled", "true"])?;
    assert_eq!(output["changed"], true);
    cli.json(&["settings", "set", "historyExclusionList", "secret\n\ntoken "])?;

    let settings = cli.json(&["settings", "show", "--reveal"])?;
    assert_eq!(settings["historyExclusionList"], "secret\ntoken");

    let output = cli.json(&["capture", "--text", "my SECRET value"])?;
    assert_eq!(output["captured"], false);
    assert_eq!(output["event"]["decision"]["reason"], "excludedContent");

    let output = cli.json(&["capture", "--text", "plain value"])?;
    assert_eq!(output["captured"], true);
    Ok(())
}

#[test]
fn invalid_setting_fails_without_writing() -> Result<()> {
    let cli = Cli::new()?;
    let output = cli.run(&["settings", "set", "autoClearSettingsDuration", "4"])?;

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("not a valid duration"));
    assert!(!cli.config().exists());
    Ok(())
}

#[test]
fn settings_init_refuses_silent_overwrite() -> Result<()> {
    let cli = Cli::new()?;
    cli.run(&["settings", "init"])?;
    let contents = fs::read_to_string(cli.config())?;
    assert!(contents.starts_with("# PasteBar settings"));

    fs::write(cli.config(), "# edited\n")?;
    cli.run(&["settings", "init"])?;
    assert_eq!(fs::read_to_string(cli.config())?, "# edited\n");

    cli.run(&["settings", "init", "--force"])?;
    assert!(fs::read_to_string(cli.config())?.starts_with("# PasteBar settings"));
    Ok(())
}

#[test]
fn languages_toggle_and_prioritize() -> Result<()> {
    let cli = Cli::new()?;
    cli.json(&["languages", "toggle", "rust"])?;
    cli.json(&["languages", "toggle", "go"])?;
    let output = cli.json(&["languages", "prioritize", "go", "rust"])?;
    assert_eq!(output["prioritized"], json!(["go", "rust"]));

    let output = cli.json(&["languages", "list"])?;
    assert_eq!(output["enabled"], json!(["rust", "go"]));
    assert_eq!(output["prioritized"], json!(["go", "rust"]));

    assert!(!cli.run(&["languages", "toggle", "klingon"])?.status.success());
    Ok(())
}

#[test]
fn auto_clear_reports_expiry() -> Result<()> {
    let cli = Cli::new()?;
    cli.json(&["settings", "set", "isAutoClearSettingsEnabled", "true"])?;
    cli.json(&["settings", "set", "autoClearSettingsDurationType", "days"])?;

    let output = cli.json(&["auto-clear", "--created-at", "2000-01-01T00:00:00Z"])?;
    assert_eq!(output["label"], "1 Day");
    assert_eq!(output["retentionDays"], 1);
    assert_eq!(output["expired"], true);

    assert!(!cli.run(&["auto-clear", "--created-at", "yesterday"])?.status.success());
    Ok(())
}

#[test]
fn data_location_set_and_revert() -> Result<()> {
    let cli = Cli::new()?;
    let target = cli.path().join("target");
    fs::create_dir_all(&target)?;
    let target_arg = target.to_string_lossy().into_owned();

    let output = cli.json(&["data-location", "check", &target_arg])?;
    assert_eq!(output["status"], "Empty");
    assert_eq!(output["valid"], true);

    let output = cli.json(&["data-location", "set", &target_arg, "--yes"])?;
    assert_eq!(output["changed"], true);
    assert_eq!(output["restartRequired"], true);

    let settings = cli.json(&["settings", "show", "--reveal"])?;
    assert_eq!(settings["customDbPath"], target_arg.as_str());

    let again = cli.run(&["data-location", "set", &target_arg, "--yes"])?;
    assert!(!again.status.success());

    let output = cli.json(&["data-location", "revert"])?;
    assert_eq!(output["changed"], false);
    let output = cli.json(&["data-location", "revert", "--yes"])?;
    assert_eq!(output["changed"], true);
    assert_eq!(cli.json(&["settings", "show", "--reveal"])?.get("customDbPath"), None);
    Ok(())
}
