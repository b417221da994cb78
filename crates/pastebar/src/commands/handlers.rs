use std::path::Path;

use anyhow::{Result, anyhow, bail};
use pastebar_app::db_location::{self, check_custom_data_path, validate_custom_db_path};
use pastebar_app::language::{self, is_supported, parse_min_lines};
use pastebar_app::text::mask_value;
use pastebar_app::{
    CaptureDecision, CapturePolicy, ClipboardMonitor, ClipboardPayload, DataLocationManager, DbOperation, Dialog,
    LanguageToggle, MAX_ENABLED_LANGUAGES, SUPPORTED_LANGUAGES, Settings, SettingsStore, mask_words,
};
use pastebar_core::item_options::{note_options, should_show_note_icon};
use pastebar_core::preview::NO_CONTENT_PLACEHOLDER;
use pastebar_core::tree::find_node;
use pastebar_core::{
    DashboardNode, DragGeometrySnapshot, ItemId, compute_preview, count_extra_lines, resolve_next_drop_target,
};
use serde_json::{Value, json};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use super::Payload;

const MIN_LINES_KEY: &str = "historyDetectLanguageMinLines";

pub fn preview(text: &str, is_image: bool, large: bool) -> Value {
    let result = compute_preview(text, is_image, large);
    let display = if text.is_empty() {
        NO_CONTENT_PLACEHOLDER.to_owned()
    } else {
        result.text.clone()
    };
    let more_lines = if is_image { None } else { count_extra_lines(text) };
    json!({
        "preview": result,
        "display": display,
        "moreLines": more_lines,
    })
}

pub fn navigate(key: &str, snapshot: &DragGeometrySnapshot) -> Value {
    let outcome = resolve_next_drop_target(key, snapshot);
    json!({
        "preventDefault": outcome.prevents_default(),
        "coordinate": outcome.coordinate(),
    })
}

pub fn board(tree: &[DashboardNode], id: &ItemId) -> Result<Value> {
    let target = id.without_pinned();
    let node = find_node(tree, &|node: &DashboardNode| {
        node.as_board().is_some_and(|board| board.id == target)
    })
    .ok_or_else(|| anyhow!("board not found: {target}"))?;
    let board = node
        .as_board()
        .ok_or_else(|| anyhow!("{target} is not a board"))?;
    let children: Vec<&ItemId> = board.children.iter().map(DashboardNode::id).collect();
    Ok(json!({
        "id": board.id,
        "name": board.name,
        "tabId": board.tab_id,
        "children": children,
        "descendantIds": node.descendant_ids(),
    }))
}

pub fn note_icon(settings: &Settings, description: Option<&str>, options: Option<&str>) -> Value {
    let defaults = settings.note_icon_defaults();
    json!({
        "showIcon": should_show_note_icon(description, options, Some(&defaults)),
        "noteOptions": note_options(options, Some(&defaults)),
    })
}

pub fn capture(settings: &Settings, payload: &Payload, source_app: Option<&str>) -> Value {
    let monitor = ClipboardMonitor::new(CapturePolicy::from_settings(settings));
    let change = if payload.is_image {
        ClipboardPayload::Image
    } else {
        ClipboardPayload::Text(&payload.text)
    };
    let event = monitor.on_change(change, source_app);
    let masked = match &event.decision {
        CaptureDecision::Text {
            text, detect_options, ..
        } if !detect_options.auto_mask_words_list.is_empty() => {
            Some(mask_words(text, &detect_options.auto_mask_words_list).into_owned())
        }
        _ => None,
    };
    json!({
        "captured": event.decision.is_capture(),
        "event": event,
        "masked": masked,
    })
}

pub fn show_settings(settings: &Settings, reveal: bool) -> Result<Value> {
    let mut output = serde_json::to_value(settings)?;
    if !reveal {
        let masked: Vec<String> = settings.auto_mask_words_list.lines().map(mask_value).collect();
        output["autoMaskWordsList"] = json!(masked.join("\n"));
    }
    Ok(output)
}

pub fn set_setting(store: &SettingsStore, key: &str, raw: &str) -> Result<Value> {
    let value = if key == MIN_LINES_KEY {
        parse_min_lines(raw, store.snapshot().history_detect_language_min_lines).to_string()
    } else {
        raw.to_owned()
    };
    let changed = store.set_field(key, &value)?;
    let settings = serde_json::to_value(store.snapshot())?;
    Ok(json!({
        "key": key,
        "value": settings.get(key),
        "changed": changed,
    }))
}

pub fn list_languages(settings: &Settings) -> Value {
    json!({
        "detectionEnabled": settings.is_history_detect_language_enabled,
        "minLines": settings.history_detect_language_min_lines,
        "maxEnabled": MAX_ENABLED_LANGUAGES,
        "supported": SUPPORTED_LANGUAGES,
        "enabled": settings.history_detect_languages_enabled_list,
        "prioritized": language::effective_prioritized(
            &settings.history_detect_languages_enabled_list,
            &settings.history_detect_languages_prioritized_list,
        ),
    })
}

pub fn toggle_language(store: &SettingsStore, language: &str) -> Result<Value> {
    let settings = store.snapshot();
    let enabled = settings
        .history_detect_languages_enabled_list
        .iter()
        .any(|lang| lang == language);
    if !enabled && !is_supported(language) {
        bail!("unsupported language: {language}");
    }
    let outcome = match store.toggle_detect_language(language) {
        LanguageToggle::Enabled => "enabled",
        LanguageToggle::Disabled => "disabled",
        LanguageToggle::LimitReached => "limitReached",
    };
    let mut output = list_languages(&store.snapshot());
    output["outcome"] = json!(outcome);
    Ok(output)
}

pub fn prioritize_language(store: &SettingsStore, language: &str, over: &str) -> Value {
    let moved = store.move_language_priority(language, over);
    let mut output = list_languages(&store.snapshot());
    output["moved"] = json!(moved);
    output
}

pub fn auto_clear(settings: &Settings, created_at: Option<OffsetDateTime>, now: OffsetDateTime) -> Result<Value> {
    let schedule = settings.auto_clear_schedule()?;
    let enabled = settings.is_auto_clear_settings_enabled;
    let expired = created_at.map(|created_at| enabled && schedule.is_expired(created_at, now));
    Ok(json!({
        "enabled": enabled,
        "durationType": schedule.duration_type().as_str(),
        "duration": schedule.duration(),
        "label": schedule.label(),
        "retentionDays": schedule.retention().whole_days(),
        "cutoff": schedule.cutoff(now).format(&Rfc3339)?,
        "expired": expired,
    }))
}

pub fn show_data_location(manager: &DataLocationManager<'_>, default_dir: &Path) -> Value {
    let current = manager.current_data_dir();
    json!({
        "current": current,
        "default": default_dir,
        "custom": current != default_dir,
        "database": current.join(db_location::DB_FILE_NAME),
    })
}

pub fn check_data_location(path: &Path, current: Option<&Path>) -> Value {
    let validation = validate_custom_db_path(path, current);
    let (status, error) = match (check_custom_data_path(path), validation) {
        (Ok(status), Ok(())) => (Some(status), None),
        (Ok(status), Err(err)) => (Some(status), Some(err.to_string())),
        (Err(err), _) => (None, Some(err.to_string())),
    };
    json!({
        "path": path,
        "status": status,
        "valid": error.is_none(),
        "error": error,
    })
}

pub fn set_data_location(
    manager: &DataLocationManager<'_>,
    selected: &Path,
    operation: DbOperation,
    dialog: &mut impl Dialog,
) -> Result<Value> {
    let Some(folder) = db_location::resolve_data_folder(selected, dialog)? else {
        return Ok(json!({ "changed": false, "current": manager.current_data_dir() }));
    };
    let changed = manager.apply(&folder, operation, dialog)?;
    if changed {
        dialog.message("Data folder changed. Restart PasteBar to use it.");
    }
    Ok(json!({
        "changed": changed,
        "operation": operation.as_str(),
        "current": manager.current_data_dir(),
        "restartRequired": changed,
    }))
}

pub fn revert_data_location(manager: &DataLocationManager<'_>, dialog: &mut impl Dialog) -> Value {
    let changed = manager.revert_to_default(dialog);
    json!({
        "changed": changed,
        "current": manager.current_data_dir(),
        "restartRequired": changed,
    })
}
