use crate::domain::group::GroupIdentity;
use crate::domain::ids::{GroupId, TournamentId};
use crate::domain::participant::ParticipantRecord;
use crate::domain::roster::GroupRoster;
use crate::utils::error::Result;
use async_trait::async_trait;

/// 名單的持久化介面，由儲存層實作
#[async_trait]
pub trait RosterRepository: Send + Sync {
    async fn load_roster(&self, group_id: GroupId) -> Result<Option<GroupRoster>>;

    /// 依段級位排序的參加者，結果必須與 `GroupRoster::seeding_order` 一致
    async fn load_sorted_by_rank(&self, group_id: GroupId) -> Result<Vec<ParticipantRecord>>;

    /// 整份快照覆寫（先全刪再全寫），不是差異更新
    async fn save_roster(&self, roster: GroupRoster) -> Result<GroupRoster>;

    async fn delete_all_for_group(&self, group_id: GroupId) -> Result<()>;
}

#[async_trait]
pub trait GroupRepository: Send + Sync {
    async fn find_group(
        &self,
        tournament_id: TournamentId,
        group_number: u8,
    ) -> Result<Option<GroupIdentity>>;

    /// 依組別編號排序
    async fn find_all_groups(&self, tournament_id: TournamentId) -> Result<Vec<GroupIdentity>>;

    async fn save_group(&self, identity: GroupIdentity) -> Result<GroupIdentity>;

    async fn delete_group(&self, tournament_id: TournamentId, group_number: u8) -> Result<()>;
}
