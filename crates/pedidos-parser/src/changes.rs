//! Per-record field changes handed to the case-management update robot.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use chrono::NaiveDateTime;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::OutputError;
use crate::model::{Cell, Field, Record};

pub const DEFAULT_UPDATE_DIR: &str = "atualizacoes_robo";

static UNSAFE_FILE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[\\/*?:"<>|]"#).expect("hardcoded file-name regex is valid"));

/// A record as loaded from the case-management system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedRecord {
    pub id: i64,
    #[serde(flatten)]
    pub record: Record,
}

/// `{"id": ..., "<api column>": "<new value>", ...}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordChange {
    pub id: i64,
    #[serde(flatten)]
    pub fields: BTreeMap<String, String>,
}

fn is_edited(original: &Cell, edited: &Cell) -> bool {
    !edited.is_missing() && original.as_str() != edited.as_str()
}

/// Changed fields per record id. Records missing from `before` are ignored.
///
/// A field left out of (or blank in) the edited record is never written, and
/// `N/A` on either side compares equal to a missing cell.
#[must_use]
pub fn diff_records(before: &[TrackedRecord], after: &[TrackedRecord]) -> Vec<RecordChange> {
    let originals = before
        .iter()
        .map(|tracked| (tracked.id, &tracked.record))
        .collect::<HashMap<_, _>>();

    after
        .iter()
        .filter_map(|edited| {
            let original = originals.get(&edited.id)?;
            let fields = Field::ALL
                .into_iter()
                .filter(|field| is_edited(original.get(*field), edited.record.get(*field)))
                .map(|field| {
                    (
                        field.api_name().to_string(),
                        edited.record.get(field).as_str().to_string(),
                    )
                })
                .collect::<BTreeMap<_, _>>();
            (!fields.is_empty()).then_some(RecordChange {
                id: edited.id,
                fields,
            })
        })
        .collect()
}

#[must_use]
pub fn update_file_name(pasta: &str, timestamp: NaiveDateTime) -> String {
    let pasta = UNSAFE_FILE_CHARS.replace_all(pasta, "");
    format!("update_{pasta}_{}.json", timestamp.format("%Y%m%d_%H%M%S"))
}

/// Writes the change list as pretty JSON, creating `dir` when needed.
pub fn write_update_file(
    dir: &Path,
    pasta: &str,
    timestamp: NaiveDateTime,
    changes: &[RecordChange],
) -> Result<PathBuf, OutputError> {
    fs::create_dir_all(dir)?;
    let path = dir.join(update_file_name(pasta, timestamp));
    let json = serde_json::to_string_pretty(changes)?;
    fs::write(&path, json)?;
    info!(path = %path.display(), changes = changes.len(), "update file written");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{TrackedRecord, diff_records, update_file_name};
    use crate::model::{Cell, Record};

    fn tracked(id: i64, objetos: &str, situacao: &str) -> TrackedRecord {
        TrackedRecord {
            id,
            record: Record {
                objetos: Cell::from(objetos),
                situacao: Cell::from(situacao),
                ..Record::default()
            },
        }
    }

    #[test]
    fn reports_only_changed_fields() {
        let before = vec![
            tracked(10, "FGTS", "Aguardando Julgamento"),
            tracked(11, "Multa", "Improcedência"),
        ];
        let after = vec![
            tracked(10, "FGTS", "Procedência"),
            tracked(11, "Multa", "Improcedência"),
        ];
        let changes = diff_records(&before, &after);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].id, 10);
        assert_eq!(
            changes[0].fields.get("situacao").map(String::as_str),
            Some("Procedência")
        );
        assert_eq!(changes[0].fields.len(), 1);
    }

    #[test]
    fn serializes_flat_change_objects() {
        let changes = diff_records(
            &[tracked(7, "FGTS", "Procedência")],
            &[tracked(7, "FGTS", "Improcedência")],
        );
        let json = serde_json::to_value(&changes).expect("serializable");
        assert_eq!(
            json,
            serde_json::json!([{ "id": 7, "situacao": "Improcedência" }])
        );
    }

    #[test]
    fn partial_edit_only_writes_supplied_fields() {
        let before: Vec<TrackedRecord> = serde_json::from_str(
            r#"[{"id": 5, "nomeObjeto": "FGTS", "situacao": "Aguardando Julgamento",
                 "resultado_1_instanci": "Procedência"}]"#,
        )
        .expect("before should deserialize");
        let after: Vec<TrackedRecord> =
            serde_json::from_str(r#"[{"id": 5, "situacao": "Procedência"}]"#)
                .expect("after should deserialize");

        let json = serde_json::to_value(diff_records(&before, &after)).expect("serializable");
        assert_eq!(
            json,
            serde_json::json!([{ "id": 5, "situacao": "Procedência" }])
        );
    }

    #[test]
    fn sentinel_and_null_are_not_a_change() {
        let before: Vec<TrackedRecord> = serde_json::from_str(
            r#"[{"id": 8, "nomeObjeto": "Multa", "resultado_2_instanci": null}]"#,
        )
        .expect("before should deserialize");
        let after: Vec<TrackedRecord> = serde_json::from_str(
            r#"[{"id": 8, "nomeObjeto": "Multa", "resultado_2_instanci": "N/A"}]"#,
        )
        .expect("after should deserialize");
        assert!(diff_records(&before, &after).is_empty());

        let parsed_sentinel = TrackedRecord {
            id: 8,
            record: Record {
                objetos: Cell::from("Multa"),
                resultado_2a_instancia: Cell::from("N/A"),
                ..Record::default()
            },
        };
        assert!(diff_records(&before, &[parsed_sentinel]).is_empty());
    }

    #[test]
    fn sanitizes_folder_id_in_file_name() {
        let timestamp = NaiveDate::from_ymd_opt(2025, 3, 10)
            .and_then(|date| date.and_hms_opt(14, 5, 9))
            .expect("valid timestamp");
        assert_eq!(
            update_file_name("PROC/2023:01*", timestamp),
            "update_PROC202301_20250310_140509.json"
        );
    }
}
