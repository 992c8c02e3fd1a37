// src/save/src/migrate.rs
//! Version migrations applied to the raw JSON before decoding

use serde_json::{Map, Value, json};

/// Format written by this build
pub const SAVE_VERSION: &str = "1.0";

/// One step from `from` to `to`
pub struct Migration {
    pub from: &'static str,
    pub to: &'static str,
    pub apply: fn(&mut Map<String, Value>),
}

pub static MIGRATIONS: [Migration; 1] = [Migration {
    from: "0.9",
    to: "1.0",
    apply: fill_missing_sections,
}];

/// 0.9 saves carried only the player section
fn fill_missing_sections(blob: &mut Map<String, Value>) {
    for section in ["progression", "world", "additional"] {
        blob.entry(section).or_insert_with(|| json!({}));
    }
    if let Some(player) = blob.get_mut("player").and_then(Value::as_object_mut) {
        player
            .entry("inventory")
            .or_insert_with(|| json!({ "gold": 0, "items": [] }));
    }
}

pub fn migration_from(version: &str) -> Option<&'static Migration> {
    MIGRATIONS.iter().find(|m| m.from == version)
}

/// Step `blob` forward until it reaches `target` or no step applies
///
/// Returns the version the blob ended up at. Unknown versions are left
/// as they are for the decoder to try.
pub fn migrate(blob: &mut Value, target: &str) -> String {
    let Some(object) = blob.as_object_mut() else {
        return String::new();
    };
    let mut version = object
        .get("version")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    while version != target {
        let Some(step) = migration_from(&version) else {
            log::warn!("no migration from save version '{version}' to {target}, loading as-is");
            break;
        };
        (step.apply)(object);
        log::info!("migrated save from {} to {}", step.from, step.to);
        version = step.to.to_string();
        object.insert("version".into(), Value::String(version.clone()));
    }
    version
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn old_saves_gain_missing_sections() {
        let mut blob = json!({ "version": "0.9", "timestamp": 1, "player": { "level": 3 } });
        assert_eq!(migrate(&mut blob, SAVE_VERSION), "1.0");
        assert_eq!(blob["version"], "1.0");
        assert!(blob["world"].is_object());
        assert_eq!(blob["player"]["inventory"]["items"], json!([]));
    }

    #[test]
    fn current_and_unknown_versions_are_untouched() {
        let mut current = json!({ "version": "1.0" });
        assert_eq!(migrate(&mut current, SAVE_VERSION), "1.0");
        assert_eq!(current, json!({ "version": "1.0" }));

        let mut future = json!({ "version": "7.3" });
        assert_eq!(migrate(&mut future, SAVE_VERSION), "7.3");
        assert_eq!(future["version"], "7.3");
    }
}
