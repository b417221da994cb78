//! CLI entry point for PasteBar.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use pastebar_core::ItemId;
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

mod clipboard;
mod commands;
mod config;
mod dialog;

/// Clipboard history settings and dashboard helpers.
#[derive(Parser, Debug)]
#[command(
    name = "pastebar",
    version,
    about = "pastebar: clipboard history settings, previews and dashboard navigation"
)]
struct Cli {
    /// Settings file (defaults to <config dir>/pastebar/settings.toml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

/// Where a payload comes from.
#[derive(Args, Debug, Default)]
#[group(required = true, multiple = false)]
struct InputArgs {
    /// Literal text.
    #[arg(long)]
    text: Option<String>,
    /// Read the payload from a file ("-" for stdin).
    #[arg(long)]
    file: Option<PathBuf>,
    /// Read the payload from the system clipboard.
    #[arg(long)]
    clipboard: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the bounded preview of a clip.
    Preview {
        #[command(flatten)]
        input: InputArgs,
        /// Treat the payload as base64 image data.
        #[arg(long)]
        image: bool,
        /// Preview for the large view.
        #[arg(long)]
        large: bool,
    },

    /// Resolve the next drop target for a key press during a keyboard drag.
    Navigate {
        /// Key code, e.g. ArrowDown.
        #[arg(long)]
        key: String,
        /// JSON drag geometry snapshot ("-" for stdin).
        #[arg(long, default_value = "-")]
        snapshot: PathBuf,
    },

    /// Look up a board in a dashboard tree.
    Board {
        /// JSON dashboard tree ("-" for stdin).
        #[arg(long)]
        tree: PathBuf,
        /// Board id; pinned ids resolve to their original board.
        #[arg(long)]
        id: ItemId,
    },

    /// Resolve the note icon of a clip.
    NoteIcon {
        /// Clip description.
        #[arg(long)]
        description: Option<String>,
        /// Raw item options JSON.
        #[arg(long)]
        options: Option<String>,
    },

    /// Evaluate a clipboard change against the capture rules.
    Capture {
        #[command(flatten)]
        input: InputArgs,
        /// Application the content was copied from.
        #[arg(long)]
        source_app: Option<String>,
    },

    /// Show or edit settings.
    #[command(subcommand)]
    Settings(SettingsCommand),

    /// Manage language detection.
    #[command(subcommand)]
    Languages(LanguagesCommand),

    /// Show the history retention schedule.
    AutoClear {
        /// RFC 3339 creation time of an entry to test for expiry.
        #[arg(long)]
        created_at: Option<String>,
    },

    /// Inspect or move the data folder.
    #[command(subcommand)]
    DataLocation(DataLocationCommand),
}

#[derive(Subcommand, Debug)]
enum SettingsCommand {
    /// Print the current settings. Auto-mask words are masked.
    Show {
        /// Print auto-mask words in clear text.
        #[arg(long)]
        reveal: bool,
    },

    /// Write a settings file populated with defaults.
    Init {
        /// Output path (defaults to the settings file).
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Overwrite without asking.
        #[arg(short, long)]
        force: bool,
    },

    /// Set one setting by its camelCase key.
    Set { key: String, value: String },
}

#[derive(Subcommand, Debug)]
enum LanguagesCommand {
    /// List supported, enabled and prioritized languages.
    List,

    /// Enable or disable detection of a language.
    Toggle { language: String },

    /// Move a language to the priority slot of another.
    Prioritize { language: String, over: String },
}

#[derive(Subcommand, Debug)]
enum DataLocationCommand {
    /// Print the current, default and custom data folders.
    Show,

    /// Inspect a directory as a data folder candidate.
    Check { path: PathBuf },

    /// Move the data folder.
    Set {
        path: PathBuf,
        /// Copy the database and images into the new folder.
        #[arg(long)]
        copy: bool,
        /// Answer yes to every question.
        #[arg(short, long)]
        yes: bool,
    },

    /// Go back to the default data folder.
    Revert {
        /// Answer yes to every question.
        #[arg(short, long)]
        yes: bool,
    },
}

fn main() -> Result<()> {
    let Cli { config, cmd } = Cli::parse();
    install_tracing();
    commands::run(cmd, || config::resolve_config_path(config))
}

fn install_tracing() {
    // RUST_LOG is honored; INFO otherwise.
    let filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_span_events(FmtSpan::NONE)
        .compact()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_preview_command() {
        let cli = Cli::parse_from(["pastebar", "preview", "--text", "hello", "--large"]);

        match cli.cmd {
            Command::Preview { input, image, large } => {
                assert_eq!(input.text.as_deref(), Some("hello"));
                assert!(!input.clipboard);
                assert!(!image);
                assert!(large);
            }
            _ => panic!("expected preview command"),
        }
    }

    #[test]
    fn preview_needs_exactly_one_input() {
        assert!(Cli::try_parse_from(["pastebar", "preview"]).is_err());
        assert!(Cli::try_parse_from(["pastebar", "preview", "--text", "a", "--clipboard"]).is_err());
    }

    #[test]
    fn parse_navigate_defaults_to_stdin() {
        let cli = Cli::parse_from(["pastebar", "navigate", "--key", "ArrowDown"]);

        match cli.cmd {
            Command::Navigate { key, snapshot } => {
                assert_eq!(key, "ArrowDown");
                assert_eq!(snapshot, PathBuf::from("-"));
            }
            _ => panic!("expected navigate command"),
        }
    }

    #[test]
    fn parse_settings_set_with_global_config() {
        let cli = Cli::parse_from([
            "pastebar",
            "settings",
            "set",
            "isHistoryEnabled",
            "false",
            "--config",
            "/tmp/pastebar.toml",
        ]);

        assert_eq!(cli.config, Some(PathBuf::from("/tmp/pastebar.toml")));
        match cli.cmd {
            Command::Settings(SettingsCommand::Set { key, value }) => {
                assert_eq!(key, "isHistoryEnabled");
                assert_eq!(value, "false");
            }
            _ => panic!("expected settings set command"),
        }
    }

    #[test]
    fn parse_data_location_set() {
        let cli = Cli::parse_from(["pastebar", "data-location", "set", "/data", "--copy", "-y"]);

        match cli.cmd {
            Command::DataLocation(DataLocationCommand::Set { path, copy, yes }) => {
                assert_eq!(path, PathBuf::from("/data"));
                assert!(copy);
                assert!(yes);
            }
            _ => panic!("expected data-location set command"),
        }
    }

    #[test]
    fn parse_languages_prioritize() {
        let cli = Cli::parse_from(["pastebar", "languages", "prioritize", "go", "rust"]);

        match cli.cmd {
            Command::Languages(LanguagesCommand::Prioritize { language, over }) => {
                assert_eq!(language, "go");
                assert_eq!(over, "rust");
            }
            _ => panic!("expected languages prioritize command"),
        }
    }

    #[test]
    fn parse_board_id() {
        let cli = Cli::parse_from(["pastebar", "board", "--tree", "tree.json", "--id", "b1::pinned"]);

        match cli.cmd {
            Command::Board { tree, id } => {
                assert_eq!(tree, PathBuf::from("tree.json"));
                assert_eq!(id.as_str(), "b1::pinned");
            }
            _ => panic!("expected board command"),
        }
    }
}
