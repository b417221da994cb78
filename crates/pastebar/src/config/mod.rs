//! Settings file discovery and initialization.

use anyhow::{Context, Result, anyhow};
use pastebar_app::SettingsConfig;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

/// Settings file to use: `explicit` when given, the platform default otherwise.
pub fn resolve_config_path(explicit: Option<PathBuf>) -> Result<PathBuf> {
    match explicit {
        Some(path) => Ok(path),
        None => SettingsConfig::default_path().ok_or_else(|| anyhow!("could not determine the config directory")),
    }
}

/// Initialize the settings file with defaults.
pub fn init_settings(output: &Path, force: bool) -> Result<()> {
    let stdin = io::stdin();
    let written = write_default_settings(output, force, &mut stdin.lock())?;
    if !written {
        println!("Aborted.");
        return Ok(());
    }

    println!("✓ Created settings file: {}", output.display());
    println!();
    println!("Edit this file to customize PasteBar, or use `pastebar settings set`.");
    Ok(())
}

/// Write the default settings to `path`. Returns `false` when the user
/// declined to overwrite an existing file.
fn write_default_settings(path: &Path, force: bool, input: &mut impl BufRead) -> Result<bool> {
    if path.exists() && !force && !confirm_overwrite(path, input)? {
        return Ok(false);
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }

    let content = SettingsConfig::generate_default_toml()?;
    std::fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(true)
}

fn confirm_overwrite(path: &Path, input: &mut impl BufRead) -> Result<bool> {
    print!("File already exists: {}\nOverwrite? [y/N]: ", path.display());
    io::stdout().flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;

    Ok(is_yes(&answer))
}

/// Whether a prompt answer means yes.
pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn explicit_path_wins() -> Result<()> {
        let path = resolve_config_path(Some(PathBuf::from("custom.toml")))?;
        assert_eq!(path, PathBuf::from("custom.toml"));
        Ok(())
    }

    #[test]
    fn writes_defaults_into_new_directory() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("nested").join("settings.toml");

        assert!(write_default_settings(&path, false, &mut io::empty())?);
        let loaded = SettingsConfig::load(&path)?;
        assert_eq!(loaded, SettingsConfig::default());
        Ok(())
    }

    #[test]
    fn existing_file_kept_unless_confirmed() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("settings.toml");
        fs::write(&path, "# mine\n")?;

        assert!(!write_default_settings(&path, false, &mut "n\n".as_bytes())?);
        assert_eq!(fs::read_to_string(&path)?, "# mine\n");

        assert!(write_default_settings(&path, false, &mut "Yes\n".as_bytes())?);
        assert!(fs::read_to_string(&path)?.starts_with("# PasteBar settings"));
        Ok(())
    }

    #[test]
    fn force_overwrites_without_asking() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("settings.toml");
        fs::write(&path, "# mine\n")?;

        assert!(write_default_settings(&path, true, &mut io::empty())?);
        assert!(fs::read_to_string(&path)?.starts_with("# PasteBar settings"));
        Ok(())
    }

    #[test]
    fn yes_answers() {
        assert!(is_yes("y\n"));
        assert!(is_yes(" YES "));
        assert!(!is_yes(""));
        assert!(!is_yes("no"));
    }
}
