use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use pastebar_app::{DataLocationManager, DbOperation, Settings, SettingsConfig, SettingsStore, db_location};
use pastebar_core::DashboardNode;
use serde::de::DeserializeOwned;
use serde_json::Value;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::{debug, info};

use crate::clipboard::{ClipboardContent, system_clipboard};
use crate::config;
use crate::dialog::StdinDialog;
use crate::{Command, DataLocationCommand, InputArgs, LanguagesCommand, SettingsCommand};

mod handlers;

/// Settings loaded from disk for one command.
pub struct AppContext {
    config_path: PathBuf,
    loaded: Settings,
    store: SettingsStore,
}

impl AppContext {
    pub fn load(config_path: PathBuf) -> Result<Self> {
        let loaded = SettingsConfig::load(&config_path)?.settings;
        Ok(Self {
            config_path,
            store: SettingsStore::new(loaded.clone()),
            loaded,
        })
    }

    pub const fn store(&self) -> &SettingsStore {
        &self.store
    }

    /// Persist the settings when they differ from the loaded ones.
    pub fn save_if_changed(&self) -> Result<bool> {
        let settings = self.store.snapshot();
        if settings == self.loaded {
            return Ok(false);
        }
        SettingsConfig { settings }.save(&self.config_path)?;
        info!(path = %self.config_path.display(), "settings saved");
        Ok(true)
    }
}

/// A payload to preview or capture.
pub struct Payload {
    text: String,
    is_image: bool,
}

impl Payload {
    fn load(input: InputArgs, image: bool) -> Result<Self> {
        if let Some(text) = input.text {
            return Ok(Self { text, is_image: image });
        }
        if let Some(path) = input.file {
            return Ok(Self {
                text: read_source(&path)?,
                is_image: image,
            });
        }
        let content = system_clipboard()?
            .read()?
            .ok_or_else(|| anyhow!("the clipboard is empty"))?;
        debug!(is_image = content.is_image(), "read clipboard");
        Self::from_clipboard(&content)
    }

    fn from_clipboard(content: &ClipboardContent) -> Result<Self> {
        Ok(Self {
            text: content.preview_source()?,
            is_image: content.is_image(),
        })
    }
}

/// Run `command`. `config_path` is only called by commands that touch settings.
pub fn run(command: Command, config_path: impl FnOnce() -> Result<PathBuf>) -> Result<()> {
    match command {
        Command::Preview { input, image, large } => {
            let payload = Payload::load(input, image)?;
            print_json(&handlers::preview(&payload.text, payload.is_image, large))
        }
        Command::Navigate { key, snapshot } => {
            let snapshot = read_json(&snapshot)?;
            print_json(&handlers::navigate(&key, &snapshot))
        }
        Command::Board { tree, id } => {
            let tree: Vec<DashboardNode> = read_json(&tree)?;
            print_json(&handlers::board(&tree, &id)?)
        }
        Command::NoteIcon { description, options } => {
            let ctx = AppContext::load(config_path()?)?;
            print_json(&handlers::note_icon(
                &ctx.store().snapshot(),
                description.as_deref(),
                options.as_deref(),
            ))
        }
        Command::Capture { input, source_app } => {
            let ctx = AppContext::load(config_path()?)?;
            let payload = Payload::load(input, false)?;
            print_json(&handlers::capture(&ctx.store().snapshot(), &payload, source_app.as_deref()))
        }
        Command::Settings(command) => run_settings(command, config_path),
        Command::Languages(command) => {
            let ctx = AppContext::load(config_path()?)?;
            let output = match command {
                LanguagesCommand::List => handlers::list_languages(&ctx.store().snapshot()),
                LanguagesCommand::Toggle { language } => handlers::toggle_language(ctx.store(), &language)?,
                LanguagesCommand::Prioritize { language, over } => {
                    handlers::prioritize_language(ctx.store(), &language, &over)
                }
            };
            ctx.save_if_changed()?;
            print_json(&output)
        }
        Command::AutoClear { created_at } => {
            let ctx = AppContext::load(config_path()?)?;
            let created_at = created_at
                .map(|raw| {
                    OffsetDateTime::parse(&raw, &Rfc3339).with_context(|| format!("invalid RFC 3339 time: {raw}"))
                })
                .transpose()?;
            print_json(&handlers::auto_clear(
                &ctx.store().snapshot(),
                created_at,
                OffsetDateTime::now_utc(),
            )?)
        }
        Command::DataLocation(command) => run_data_location(command, config_path),
    }
}

fn run_settings(command: SettingsCommand, config_path: impl FnOnce() -> Result<PathBuf>) -> Result<()> {
    match command {
        SettingsCommand::Init { output, force } => {
            let output = match output {
                Some(output) => output,
                None => config_path()?,
            };
            config::init_settings(&output, force)
        }
        SettingsCommand::Show { reveal } => {
            let ctx = AppContext::load(config_path()?)?;
            print_json(&handlers::show_settings(&ctx.store().snapshot(), reveal)?)
        }
        SettingsCommand::Set { key, value } => {
            let ctx = AppContext::load(config_path()?)?;
            let output = handlers::set_setting(ctx.store(), &key, &value)?;
            ctx.save_if_changed()?;
            print_json(&output)
        }
    }
}

fn run_data_location(command: DataLocationCommand, config_path: impl FnOnce() -> Result<PathBuf>) -> Result<()> {
    let ctx = AppContext::load(config_path()?)?;
    let default_dir =
        db_location::default_data_dir().ok_or_else(|| anyhow!("could not determine the data directory"))?;
    let manager = DataLocationManager::new(ctx.store(), default_dir.clone());
    let output = match command {
        DataLocationCommand::Show => Ok(handlers::show_data_location(&manager, &default_dir)),
        DataLocationCommand::Check { path } => Ok(handlers::check_data_location(
            &path,
            ctx.store().snapshot().custom_db_path.as_deref(),
        )),
        DataLocationCommand::Set { path, copy, yes } => {
            let operation = if copy { DbOperation::Copy } else { DbOperation::None };
            let mut dialog = StdinDialog::stdin(yes);
            handlers::set_data_location(&manager, &path, operation, &mut dialog)
        }
        DataLocationCommand::Revert { yes } => {
            let mut dialog = StdinDialog::stdin(yes);
            Ok(handlers::revert_data_location(&manager, &mut dialog))
        }
    };
    // A failed copy has already reverted the folder; persist that too.
    ctx.save_if_changed()?;
    print_json(&output?)
}

fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Read a file, or stdin for `-`.
fn read_source(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf).context("failed to read stdin")?;
        return Ok(buf);
    }
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = read_source(path)?;
    if raw.trim().is_empty() {
        bail!("{} is empty", path.display());
    }
    serde_json::from_str(&raw).with_context(|| format!("failed to parse JSON from {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn clipboard_images_become_image_payloads() -> Result<()> {
        let payload = Payload::from_clipboard(&ClipboardContent::Image {
            width: 1,
            height: 1,
            bytes: vec![0, 0, 0, 0],
        })?;
        assert!(payload.is_image);
        assert!(payload.text.starts_with("iVBORw0KGgo"));
        Ok(())
    }

    #[test]
    fn literal_text_keeps_image_flag() -> Result<()> {
        let input = InputArgs {
            text: Some("aGVsbG8".into()),
            ..InputArgs::default()
        };
        let payload = Payload::load(input, true)?;
        assert!(payload.is_image);
        assert_eq!(payload.text, "aGVsbG8");
        Ok(())
    }

    #[test]
    fn read_json_reports_the_path() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("tree.json");
        std::fs::write(&path, "[{\"type\": \"Board\"")?;

        let Err(err) = read_json::<Vec<DashboardNode>>(&path) else {
            panic!("truncated JSON should not parse");
        };
        assert!(err.to_string().contains("tree.json"));
        Ok(())
    }

    fn no_config_dir() -> Result<PathBuf> {
        bail!("could not determine the config directory")
    }

    #[test]
    fn geometry_commands_do_not_need_a_config_dir() -> Result<()> {
        let dir = tempdir()?;
        let snapshot = dir.path().join("snapshot.json");
        std::fs::write(&snapshot, "{}")?;
        run(
            Command::Navigate {
                key: "ArrowDown".into(),
                snapshot,
            },
            no_config_dir,
        )?;

        let tree = dir.path().join("tree.json");
        std::fs::write(&tree, r#"[{"type": "Board", "id": "b1", "name": "Work"}]"#)?;
        run(
            Command::Board {
                tree,
                id: pastebar_core::ItemId::new("b1"),
            },
            no_config_dir,
        )
    }

    #[test]
    fn settings_commands_report_a_missing_config_dir() {
        let command = Command::NoteIcon {
            description: None,
            options: None,
        };
        let Err(err) = run(command, no_config_dir) else {
            panic!("note-icon needs the settings file");
        };
        assert!(err.to_string().contains("config directory"));
    }

    #[test]
    fn only_changes_are_saved() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("settings.toml");
        let ctx = AppContext::load(path.clone())?;

        assert!(!ctx.save_if_changed()?);
        assert!(!path.exists());

        ctx.store().set_field("isHistoryEnabled", "false")?;
        assert!(ctx.save_if_changed()?);
        assert!(!SettingsConfig::load(&path)?.settings.is_history_enabled);
        Ok(())
    }
}
