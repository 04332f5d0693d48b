use sea_orm::ConnectionTrait;
use serde::Serialize;
use time::OffsetDateTime;

use super::{lifecycle_view, GameFlowService};
use crate::domain::lifecycle::derive_phase;
use crate::domain::{CalledValue, GameType, Pattern, RoomPhase, Stage};
use crate::error::AppError;
use crate::repos::players::Player;
use crate::repos::rooms::{Room, RoomMode};
use crate::repos::winners::WinnerRecord;
use crate::repos::{calls, players, rooms, stages, winners};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoomSummary {
    pub id: i64,
    pub room_code: String,
    pub host_player_id: Option<i64>,
    pub game_type: GameType,
    pub progressive: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<Pattern>,
    pub prize_value: i64,
    pub game_no: i32,
    pub winner_player_id: Option<i64>,
    pub version: i32,
}

impl From<&Room> for RoomSummary {
    fn from(room: &Room) -> Self {
        Self {
            id: room.id,
            room_code: room.room_code.clone(),
            host_player_id: room.host_player_id,
            game_type: room.game_type,
            progressive: room.mode == RoomMode::Progressive,
            pattern: room.mode.single_pattern(),
            prize_value: room.prize_value,
            game_no: room.game_no,
            winner_player_id: room.winner_player_id,
            version: room.version,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaderboardEntry {
    pub player_id: i64,
    pub display_name: String,
    pub bot: bool,
    pub wins: i32,
    pub prize_total: i64,
}

impl From<Player> for LeaderboardEntry {
    fn from(p: Player) -> Self {
        Self {
            bot: p.is_bot(),
            player_id: p.id,
            display_name: p.display_name,
            wins: p.wins,
            prize_total: p.prize_total,
        }
    }
}

/// Public view of a room. Card contents are not included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoomSnapshot {
    pub room: RoomSummary,
    pub phase: RoomPhase,
    pub calls: Vec<CalledValue>,
    pub leaderboard: Vec<LeaderboardEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stages: Option<Vec<Stage>>,
    /// Winner records of the current game.
    pub winners: Vec<WinnerRecord>,
}

impl RoomSnapshot {
    /// Changes whenever anything in the snapshot changes except the phase,
    /// which is a function of time.
    pub fn etag(&self) -> String {
        format!(
            r#""room-{}-v{}-c{}-w{}""#,
            self.room.id,
            self.room.version,
            self.calls.len(),
            self.winners.len()
        )
    }
}

/// Highest prize total first, then most wins, then earliest joined.
fn rank(players: &mut [Player]) {
    players.sort_by(|a, b| {
        b.prize_total
            .cmp(&a.prize_total)
            .then(b.wins.cmp(&a.wins))
            .then(a.id.cmp(&b.id))
    });
}

impl GameFlowService {
    pub async fn room_snapshot<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        room_id: i64,
        now: OffsetDateTime,
    ) -> Result<RoomSnapshot, AppError> {
        let room = rooms::require_room(conn, room_id).await?;
        let history = calls::load_history(conn, room.id).await?;
        let view = lifecycle_view(conn, &room, &history).await?;
        let phase = derive_phase(&view, now, self.fairness_window());

        let mut roster = players::list_by_room(conn, room.id).await?;
        rank(&mut roster);
        let stage_list = stages::load_state(conn, room.id)
            .await?
            .map(|state| state.stages().to_vec());
        let winners = winners::list_for_game(conn, room.id, room.game_no).await?;

        Ok(RoomSnapshot {
            room: RoomSummary::from(&room),
            phase,
            calls: history.calls().to_vec(),
            leaderboard: roster.into_iter().map(LeaderboardEntry::from).collect(),
            stages: stage_list,
            winners,
        })
    }
}
