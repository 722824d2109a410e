use crate::domain::{GroupIdentity, GroupRoster, NewParticipant};
use crate::utils::error::{Result, RosterError};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::{Read, Write};

pub const IMPORT_HEADER: [&str; 3] = ["affiliation", "name", "rank"];

#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    sequence: u32,
    affiliation: &'a str,
    name: &'a str,
    rank: &'a str,
}

/// 讀取 `affiliation,name,rank` 格式的報名 CSV，所屬空白視為未填。
/// 這裡只做欄位解析，姓名與段級位的驗證由名單負責。
pub fn read_participants<R: Read>(reader: R) -> Result<Vec<NewParticipant>> {
    let mut csv_reader = ::csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(::csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?;
    let missing: Vec<&str> = IMPORT_HEADER
        .iter()
        .copied()
        .filter(|column| !headers.iter().any(|header| header == *column))
        .collect();
    if !missing.is_empty() {
        return Err(RosterError::validation(format!(
            "participant CSV is missing column(s): {}",
            missing.join(", ")
        )));
    }

    let mut participants = Vec::new();
    for row in csv_reader.deserialize() {
        let mut participant: NewParticipant = row?;
        if participant
            .affiliation
            .as_deref()
            .is_some_and(|affiliation| affiliation.is_empty())
        {
            participant.affiliation = None;
        }
        participants.push(participant);
    }

    tracing::debug!("📥 Parsed {} participant rows from CSV", participants.len());
    Ok(participants)
}

/// 以登錄順寫出名單，不含不戰勝佔位者
pub fn write_roster<W: Write>(writer: W, roster: &GroupRoster) -> Result<usize> {
    let mut csv_writer = ::csv::Writer::from_writer(writer);
    let exported = roster.export_roster();

    for record in &exported {
        csv_writer.serialize(ExportRow {
            sequence: record.sequence_number(),
            affiliation: record.affiliation().unwrap_or_default(),
            name: record.name(),
            rank: record.rank().map(|rank| rank.label()).unwrap_or_default(),
        })?;
    }
    csv_writer.flush()?;

    Ok(exported.len())
}

/// 匯出檔名，例如 `group1_20250301_093000.csv`
pub fn export_file_name(group: &GroupIdentity, at: DateTime<Utc>) -> String {
    format!(
        "group{}_{}.csv",
        group.group_number(),
        at.format("%Y%m%d_%H%M%S")
    )
}
