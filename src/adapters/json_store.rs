use crate::domain::{
    GroupId, GroupIdentity, GroupRepository, GroupRoster, ParticipantRecord, RosterRepository,
    TournamentId,
};
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;

const GROUPS_DIR: &str = "groups";
const ROSTERS_DIR: &str = "rosters";

/// 名單快照檔案格式
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterSnapshot {
    pub group: GroupIdentity,
    pub participants: Vec<ParticipantRecord>,
    pub saved_at: DateTime<Utc>,
}

/// 以 JSON 檔案保存組別與名單：
/// - `groups/{tournament_id}.json`：該大會的所有組別
/// - `rosters/{group_id}.json`：單一組別的名單快照
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    base_path: PathBuf,
    write_lock: std::sync::Arc<Mutex<()>>,
}

impl JsonFileStore {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            write_lock: std::sync::Arc::new(Mutex::new(())),
        }
    }

    fn groups_file(&self, tournament_id: TournamentId) -> PathBuf {
        self.base_path
            .join(GROUPS_DIR)
            .join(format!("{}.json", tournament_id))
    }

    fn roster_file(&self, group_id: GroupId) -> PathBuf {
        self.base_path
            .join(ROSTERS_DIR)
            .join(format!("{}.json", group_id))
    }

    async fn read_groups(&self, tournament_id: TournamentId) -> Result<Vec<GroupIdentity>> {
        Ok(read_json(&self.groups_file(tournament_id))
            .await?
            .unwrap_or_default())
    }

    async fn read_snapshot(&self, group_id: GroupId) -> Result<Option<RosterSnapshot>> {
        read_json(&self.roster_file(group_id)).await
    }
}

async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    match fs::read(path).await {
        Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// 先寫暫存檔再改名，讀取端不會看到寫到一半的檔案
async fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }
    let data = serde_json::to_vec_pretty(value)?;
    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, data).await?;
    fs::rename(&tmp_path, path).await?;
    Ok(())
}

async fn remove_if_exists(path: &Path) -> Result<()> {
    match fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

#[async_trait]
impl RosterRepository for JsonFileStore {
    async fn load_roster(&self, group_id: GroupId) -> Result<Option<GroupRoster>> {
        match self.read_snapshot(group_id).await? {
            Some(snapshot) => GroupRoster::restore(snapshot.group, snapshot.participants).map(Some),
            None => Ok(None),
        }
    }

    async fn load_sorted_by_rank(&self, group_id: GroupId) -> Result<Vec<ParticipantRecord>> {
        // 快照寫入時已依種子順序排列
        Ok(self
            .read_snapshot(group_id)
            .await?
            .map(|snapshot| snapshot.participants)
            .unwrap_or_default())
    }

    async fn save_roster(&self, roster: GroupRoster) -> Result<GroupRoster> {
        let snapshot = RosterSnapshot {
            group: roster.identity().clone(),
            participants: roster.seeding_order().into_iter().cloned().collect(),
            saved_at: Utc::now(),
        };

        let _guard = self.write_lock.lock().await;
        let path = self.roster_file(roster.group_id());
        write_json(&path, &snapshot).await?;
        tracing::debug!("💾 Roster snapshot written to {}", path.display());
        Ok(roster)
    }

    async fn delete_all_for_group(&self, group_id: GroupId) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        remove_if_exists(&self.roster_file(group_id)).await
    }
}

#[async_trait]
impl GroupRepository for JsonFileStore {
    async fn find_group(
        &self,
        tournament_id: TournamentId,
        group_number: u8,
    ) -> Result<Option<GroupIdentity>> {
        Ok(self
            .read_groups(tournament_id)
            .await?
            .into_iter()
            .find(|group| group.group_number() == group_number))
    }

    async fn find_all_groups(&self, tournament_id: TournamentId) -> Result<Vec<GroupIdentity>> {
        let mut groups = self.read_groups(tournament_id).await?;
        groups.sort_by_key(GroupIdentity::group_number);
        Ok(groups)
    }

    async fn save_group(&self, identity: GroupIdentity) -> Result<GroupIdentity> {
        let _guard = self.write_lock.lock().await;
        let mut groups = self.read_groups(identity.tournament_id()).await?;
        groups.retain(|group| group.group_number() != identity.group_number());
        groups.push(identity.clone());
        groups.sort_by_key(GroupIdentity::group_number);
        write_json(&self.groups_file(identity.tournament_id()), &groups).await?;
        Ok(identity)
    }

    async fn delete_group(&self, tournament_id: TournamentId, group_number: u8) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut groups = self.read_groups(tournament_id).await?;
        let before = groups.len();
        groups.retain(|group| group.group_number() != group_number);
        if groups.len() != before {
            write_json(&self.groups_file(tournament_id), &groups).await?;
        }
        Ok(())
    }
}
