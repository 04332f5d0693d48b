//! Claim adjudication against the stored game.
//!
//! Every claim starts by bumping the room's version, so two claims (or a claim
//! and a call) for the same room never work against the same snapshot: the
//! loser of that race gets `OPTIMISTIC_LOCK` and may retry. The split itself
//! is recomputed from the recorded winners each time, so the final amounts do
//! not depend on arrival order.

use sea_orm::DatabaseTransaction;
use serde::Serialize;
use time::OffsetDateTime;
use tracing::{debug, info, warn};

use super::GameFlowService;
use crate::domain::adjudication::WindowEntry;
use crate::domain::{
    decide_window, plan_split, validate_claim_marks, CallHistory, Card, CellSet, Pattern,
    WindowDecision,
};
use crate::error::AppError;
use crate::errors::domain::{ConflictKind, DomainError, NotFoundKind, ValidationKind};
use crate::repos::rooms::{Room, RoomMode};
use crate::repos::winners::{NewWinner, WinnerRecord};
use crate::repos::{calls, cards, players, rooms, stages, winners};

#[derive(Debug, Clone, Default)]
pub struct ClaimRequest {
    pub player_id: i64,
    pub card_id: i64,
    /// Pattern the client believes it completed. Defaults to the room's
    /// pattern; ignored in progressive rooms.
    pub pattern: Option<Pattern>,
    /// Marks as the client saw them. Defaults to the card's stored marks.
    pub marks: Option<CellSet>,
    /// Client-chosen id making retries of the same claim idempotent.
    pub claim_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SplitSummary {
    pub winners: usize,
    pub share: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub window_closes_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClaimOutcome {
    pub record: WinnerRecord,
    /// True when this was a retry of a claim that had already been awarded.
    pub replayed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub split: Option<SplitSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage_position: Option<u8>,
    /// Single mode: a winner is recorded. Progressive: every stage is claimed.
    pub game_over: bool,
}

impl GameFlowService {
    /// Adjudicate a claim that `card_id` satisfies a pattern in play.
    pub async fn submit_claim(
        &self,
        txn: &DatabaseTransaction,
        room_id: i64,
        req: ClaimRequest,
        now: OffsetDateTime,
    ) -> Result<ClaimOutcome, AppError> {
        self.adjudicate(txn, room_id, &req, now)
            .await
            .inspect_err(|e| {
                warn!(
                    room_id,
                    player_id = req.player_id,
                    card_id = req.card_id,
                    code = e.code().as_str(),
                    "Claim rejected"
                );
            })
    }

    async fn adjudicate(
        &self,
        txn: &DatabaseTransaction,
        room_id: i64,
        req: &ClaimRequest,
        now: OffsetDateTime,
    ) -> Result<ClaimOutcome, AppError> {
        let room = rooms::require_room(txn, room_id).await?;
        let room = rooms::bump_version(txn, &room).await?;

        players::require_in_room(txn, room.id, req.player_id).await?;
        let card = cards::require_in_room(txn, room.id, req.card_id).await?.card;
        if card.player_id != req.player_id {
            return Err(DomainError::not_found(
                NotFoundKind::Card,
                format!("card {} does not belong to player {}", card.id, req.player_id),
            )
            .into());
        }

        if let Some(replay) = self.find_replay(txn, &room, req).await? {
            return Ok(replay);
        }

        let history = calls::load_history(txn, room.id).await?;
        let asserted = req.marks.unwrap_or_else(|| card.marks());
        let marks = validate_claim_marks(&card, asserted, &history)?;

        match room.mode {
            RoomMode::Single(in_play) => {
                self.claim_single(txn, &room, &card, req, in_play, marks, &history, now)
                    .await
            }
            RoomMode::Progressive => self.claim_stage(txn, &room, &card, req, marks, now).await,
        }
    }

    /// A retried claim carrying the `claim_id` of an awarded one returns the
    /// stored outcome without touching the ledger.
    async fn find_replay(
        &self,
        txn: &DatabaseTransaction,
        room: &Room,
        req: &ClaimRequest,
    ) -> Result<Option<ClaimOutcome>, AppError> {
        let Some(claim_id) = req.claim_id.as_deref() else {
            return Ok(None);
        };
        let record = winners::list_for_game(txn, room.id, room.game_no)
            .await?
            .into_iter()
            .find(|r| r.player_id == req.player_id && r.claim_id.as_deref() == Some(claim_id));
        Ok(record.map(|record| {
            debug!(room_id = room.id, claim_id, "Claim replayed");
            ClaimOutcome {
                record,
                replayed: true,
                split: None,
                stage_position: None,
                game_over: room.winner_player_id.is_some(),
            }
        }))
    }

    #[allow(clippy::too_many_arguments)]
    async fn claim_single(
        &self,
        txn: &DatabaseTransaction,
        room: &Room,
        card: &Card,
        req: &ClaimRequest,
        in_play: Pattern,
        marks: CellSet,
        history: &CallHistory,
        now: OffsetDateTime,
    ) -> Result<ClaimOutcome, AppError> {
        let pattern = req.pattern.unwrap_or(in_play);
        if pattern != in_play {
            return Err(DomainError::validation(
                ValidationKind::PatternNotInPlay,
                format!("this room is playing '{in_play}', not '{pattern}'"),
            )
            .into());
        }
        if !pattern.is_satisfied(marks) {
            return Err(DomainError::validation(
                ValidationKind::NoWinningPattern,
                format!("marks do not complete '{pattern}'"),
            )
            .into());
        }
        if winners::find_for_player(txn, room.id, room.game_no, req.player_id, pattern)
            .await?
            .is_some()
        {
            return Err(DomainError::conflict(
                ConflictKind::AlreadyClaimed,
                format!("player {} already won '{pattern}' this game", req.player_id),
            )
            .into());
        }

        let recorded = winners::list_for_pattern(txn, room.id, room.game_no, pattern).await?;
        let decision = decide_window(
            recorded.first().map(|r| r.claimed_at),
            history.first_called_at(),
            now,
            self.fairness_window(),
        );
        let window = decision.window();
        if let WindowDecision::Closed(_) = decision {
            return Err(DomainError::conflict(
                ConflictKind::PatternAlreadyWon,
                format!("'{pattern}' was won and its window closed at {}", window.end()),
            )
            .into());
        }

        let in_window =
            winners::list_in_window(txn, room.id, room.game_no, pattern, window.start, window.end())
                .await?;
        let entries: Vec<WindowEntry> = in_window
            .iter()
            .map(|r| WindowEntry {
                record_id: r.id,
                player_id: r.player_id,
                prize_amount: r.prize_amount,
            })
            .collect();
        let plan = plan_split(room.prize_value, &entries);

        let record = winners::create(
            txn,
            NewWinner {
                room_id: room.id,
                game_no: room.game_no,
                player_id: req.player_id,
                card_id: card.id,
                pattern,
                prize_amount: plan.share,
                claim_id: req.claim_id.as_deref(),
                claimed_at: now,
            },
        )
        .await?;

        for correction in &plan.corrections {
            let applied = winners::cas_prize_amount(
                txn,
                correction.record_id,
                correction.old_amount,
                correction.new_amount,
            )
            .await?;
            if !applied {
                return Err(DomainError::conflict(
                    ConflictKind::OptimisticLock,
                    format!("winner record {} changed during the split", correction.record_id),
                )
                .into());
            }
            players::add_to_ledger(txn, correction.player_id, 0, correction.delta()).await?;
        }
        players::add_to_ledger(txn, req.player_id, 1, plan.share).await?;
        rooms::set_winner_if_absent(txn, room.id, req.player_id, Some(window.start)).await?;

        info!(
            room_id = room.id,
            game_no = room.game_no,
            player_id = req.player_id,
            pattern = %pattern,
            winners = plan.winners,
            share = plan.share,
            opened_window = matches!(decision, WindowDecision::Opens(_)),
            "Claim awarded"
        );
        Ok(ClaimOutcome {
            record,
            replayed: false,
            split: Some(SplitSummary {
                winners: plan.winners,
                share: plan.share,
                window_closes_at: window.end(),
            }),
            stage_position: None,
            game_over: true,
        })
    }

    async fn claim_stage(
        &self,
        txn: &DatabaseTransaction,
        room: &Room,
        card: &Card,
        req: &ClaimRequest,
        marks: CellSet,
        now: OffsetDateTime,
    ) -> Result<ClaimOutcome, AppError> {
        let mut state = stages::load_state(txn, room.id).await?.ok_or_else(|| {
            crate::repos::corrupt("progressive stages", "progressive room has no stages")
        })?;
        let stage = state.route_claim(marks)?.clone();

        if !stages::claim_if_unclaimed(txn, room.id, stage.position, req.player_id, now).await? {
            return Err(DomainError::conflict(
                ConflictKind::PatternAlreadyWon,
                format!("stage '{}' has already been won", stage.pattern),
            )
            .into());
        }
        state.apply_claim(stage.position, req.player_id, now)?;

        let record = winners::create(
            txn,
            NewWinner {
                room_id: room.id,
                game_no: room.game_no,
                player_id: req.player_id,
                card_id: card.id,
                pattern: stage.pattern,
                prize_amount: stage.prize,
                claim_id: req.claim_id.as_deref(),
                claimed_at: now,
            },
        )
        .await?;
        players::add_to_ledger(txn, req.player_id, 1, stage.prize).await?;

        let complete = state.is_complete();
        if complete {
            rooms::set_winner_if_absent(txn, room.id, req.player_id, None).await?;
        }

        info!(
            room_id = room.id,
            game_no = room.game_no,
            player_id = req.player_id,
            stage = stage.position,
            pattern = %stage.pattern,
            prize = stage.prize,
            remaining = state.remaining(),
            "Stage awarded"
        );
        Ok(ClaimOutcome {
            record,
            replayed: false,
            split: None,
            stage_position: Some(stage.position),
            game_over: complete,
        })
    }
}
