//! Room HTTP routes: setup, calling, marking, claims and resets.
//!
//! Handlers parse the wire shapes into domain types and hand off to the
//! services inside a single transaction. There is no authentication layer:
//! the acting player is named in the request and checked against the room.

use actix_web::http::header::ETAG;
use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::db::txn::with_txn;
use crate::domain::lifecycle::{ensure_can_call, ensure_host};
use crate::domain::{Cell, CellSet, GameType, Pattern, RoomConfig, WinMode};
use crate::error::AppError;
use crate::extractors::JsonBody;
use crate::http::etag::if_none_match_hits;
use crate::repos::cards::CardRecord;
use crate::repos::{calls, rooms};
use crate::services::ai_dispatch;
use crate::services::game_flow::{
    lifecycle_view, Caller, ClaimRequest, GameFlowService, ResetRequest, RoomSummary,
};
use crate::services::rooms::{RoomService, Seated};
use crate::state::app_state::AppState;

fn default_mode() -> String {
    "single".to_string()
}

fn default_card_count() -> u8 {
    1
}

fn default_marked() -> bool {
    true
}

#[derive(Debug, Deserialize)]
struct CreateRoomRequest {
    display_name: String,
    game_type: String,
    #[serde(default = "default_mode")]
    mode: String,
    pattern: Option<String>,
    stages: Option<Vec<String>>,
    prize: Option<i64>,
    #[serde(default = "default_card_count")]
    cards: u8,
}

#[derive(Debug, Deserialize)]
struct JoinRoomRequest {
    room_code: String,
    display_name: String,
    #[serde(default = "default_card_count")]
    cards: u8,
    ai_kind: Option<String>,
}

#[derive(Debug, Serialize)]
struct CardView {
    card_id: i64,
    card_no: i16,
    cells: Vec<Cell>,
    marks: CellSet,
}

impl From<CardRecord> for CardView {
    fn from(record: CardRecord) -> Self {
        Self {
            card_id: record.card.id,
            card_no: record.card_no,
            cells: record.card.layout().cells().to_vec(),
            marks: record.card.marks(),
        }
    }
}

#[derive(Debug, Serialize)]
struct SeatedResponse {
    room: RoomSummary,
    player_id: i64,
    cards: Vec<CardView>,
}

impl From<Seated> for SeatedResponse {
    fn from(seated: Seated) -> Self {
        Self {
            room: RoomSummary::from(&seated.room),
            player_id: seated.player.id,
            cards: seated.cards.into_iter().map(CardView::from).collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CallRequest {
    player_id: i64,
    value: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MarkRequest {
    player_id: i64,
    cell: u8,
    #[serde(default = "default_marked")]
    marked: bool,
}

#[derive(Debug, Deserialize)]
struct ClaimBody {
    player_id: i64,
    card_id: i64,
    pattern: Option<String>,
    marks: Option<Vec<u8>>,
    claim_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResetBody {
    player_id: i64,
    mode: Option<String>,
    pattern: Option<String>,
    stages: Option<Vec<String>>,
    prize: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct HostQuery {
    player_id: i64,
}

#[derive(Debug, Serialize)]
struct AutoCallResponse {
    room_id: i64,
    running: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    interval_ms: Option<u64>,
}

/// POST /api/rooms
async fn create_room(
    app_state: web::Data<AppState>,
    body: JsonBody<CreateRoomRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let game_type: GameType = body.game_type.parse()?;
    let win_mode = WinMode::parse(&body.mode, body.pattern.as_deref(), body.stages.as_deref())?;
    let config = RoomConfig::new(game_type, win_mode, body.prize)?;
    let settings = app_state.settings.clone();

    let seated = with_txn(&app_state, move |txn| {
        Box::pin(async move {
            RoomService::new(settings)
                .create_room(txn, &body.display_name, &config, body.cards)
                .await
        })
    })
    .await?;

    Ok(HttpResponse::Created().json(SeatedResponse::from(seated)))
}

/// POST /api/rooms/join
async fn join_room(
    app_state: web::Data<AppState>,
    body: JsonBody<JoinRoomRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let settings = app_state.settings.clone();

    let seated = with_txn(&app_state, move |txn| {
        Box::pin(async move {
            RoomService::new(settings)
                .join_room(
                    txn,
                    &body.room_code,
                    &body.display_name,
                    body.cards,
                    body.ai_kind.as_deref(),
                )
                .await
        })
    })
    .await?;

    Ok(HttpResponse::Created().json(SeatedResponse::from(seated)))
}

/// GET /api/rooms/{room_id}
///
/// Public snapshot with an ETag. A matching `If-None-Match` gets `304`.
async fn get_snapshot(
    http_req: HttpRequest,
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let room_id = path.into_inner();
    let settings = app_state.settings.clone();
    let now = app_state.now();

    let snapshot = with_txn(&app_state, move |txn| {
        Box::pin(async move {
            GameFlowService::new(settings)
                .room_snapshot(txn, room_id, now)
                .await
        })
    })
    .await?;

    let etag = snapshot.etag();
    if if_none_match_hits(http_req.headers(), &etag) {
        return Ok(HttpResponse::build(StatusCode::NOT_MODIFIED)
            .insert_header((ETAG, etag))
            .finish());
    }
    Ok(HttpResponse::Ok().insert_header((ETAG, etag)).json(snapshot))
}

/// GET /api/rooms/{room_id}/players/{player_id}/cards
async fn get_player_cards(
    path: web::Path<(i64, i64)>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let (room_id, player_id) = path.into_inner();
    let settings = app_state.settings.clone();

    let cards = with_txn(&app_state, move |txn| {
        Box::pin(async move {
            RoomService::new(settings)
                .player_cards(txn, room_id, player_id)
                .await
        })
    })
    .await?;

    let cards: Vec<CardView> = cards.into_iter().map(CardView::from).collect();
    Ok(HttpResponse::Ok().json(cards))
}

/// POST /api/rooms/{room_id}/calls
///
/// Bots react to a new call after the call has committed.
async fn append_call(
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
    body: JsonBody<CallRequest>,
) -> Result<HttpResponse, AppError> {
    let room_id = path.into_inner();
    let body = body.into_inner();
    let settings = app_state.settings.clone();
    let now = app_state.now();

    let outcome = with_txn(&app_state, move |txn| {
        Box::pin(async move {
            GameFlowService::new(settings)
                .append_call(
                    txn,
                    room_id,
                    Caller::Host(body.player_id),
                    body.value.as_deref(),
                    now,
                )
                .await
        })
    })
    .await?;

    if outcome.appended {
        ai_dispatch::spawn_after_call(app_state.get_ref().clone(), room_id, outcome.call.clone());
        Ok(HttpResponse::Created().json(outcome))
    } else {
        Ok(HttpResponse::Ok().json(outcome))
    }
}

/// POST /api/rooms/{room_id}/cards/{card_id}/marks
async fn set_mark(
    path: web::Path<(i64, i64)>,
    app_state: web::Data<AppState>,
    body: JsonBody<MarkRequest>,
) -> Result<HttpResponse, AppError> {
    let (room_id, card_id) = path.into_inner();
    let body = body.into_inner();
    let settings = app_state.settings.clone();

    let outcome = with_txn(&app_state, move |txn| {
        Box::pin(async move {
            GameFlowService::new(settings)
                .set_mark(txn, room_id, body.player_id, card_id, body.cell, body.marked)
                .await
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(outcome))
}

/// POST /api/rooms/{room_id}/claims
async fn submit_claim(
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
    body: JsonBody<ClaimBody>,
) -> Result<HttpResponse, AppError> {
    let room_id = path.into_inner();
    let body = body.into_inner();
    let req = ClaimRequest {
        player_id: body.player_id,
        card_id: body.card_id,
        pattern: body
            .pattern
            .as_deref()
            .map(str::parse::<Pattern>)
            .transpose()?,
        marks: body.marks.map(CellSet::try_from_indices).transpose()?,
        claim_id: body.claim_id,
    };
    let settings = app_state.settings.clone();
    let now = app_state.now();

    let outcome = with_txn(&app_state, move |txn| {
        Box::pin(async move {
            GameFlowService::new(settings)
                .submit_claim(txn, room_id, req, now)
                .await
        })
    })
    .await?;

    let status = if outcome.replayed {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };
    Ok(HttpResponse::build(status).json(outcome))
}

/// POST /api/rooms/{room_id}/reset
///
/// Any running automatic caller is stopped before the reset; the host
/// restarts it for the new game.
async fn reset_room(
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
    body: JsonBody<ResetBody>,
) -> Result<HttpResponse, AppError> {
    let room_id = path.into_inner();
    let body = body.into_inner();
    let new_config = match body.mode.as_deref() {
        Some(mode) => Some(ResetRequest {
            win_mode: WinMode::parse(mode, body.pattern.as_deref(), body.stages.as_deref())?,
            prize_override: body.prize,
        }),
        None => None,
    };
    let settings = app_state.settings.clone();
    let actor = body.player_id;

    // Stop the caller before the reset opens so no new tick starts against
    // the game being cleared. A tick already in flight loses the version race.
    check_auto_call(&app_state, room_id, actor, false).await?;
    app_state.auto_callers.stop(room_id);

    let room = with_txn(&app_state, move |txn| {
        Box::pin(async move {
            GameFlowService::new(settings)
                .reset_room(txn, room_id, actor, new_config)
                .await
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(RoomSummary::from(&room)))
}

/// Host check shared by the auto-call endpoints and reset. Starting also
/// requires that the game can still be called into.
async fn check_auto_call(
    app_state: &AppState,
    room_id: i64,
    actor: i64,
    starting: bool,
) -> Result<(), AppError> {
    with_txn(app_state, move |txn| {
        Box::pin(async move {
            let room = rooms::require_room(txn, room_id).await?;
            ensure_host(room.host_player_id, actor)?;
            if starting {
                let history = calls::load_history(txn, room.id).await?;
                let view = lifecycle_view(txn, &room, &history).await?;
                ensure_can_call(&view)?;
            }
            Ok(())
        })
    })
    .await
}

/// POST /api/rooms/{room_id}/auto-call
async fn start_auto_call(
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
    body: JsonBody<HostQuery>,
) -> Result<HttpResponse, AppError> {
    let room_id = path.into_inner();
    check_auto_call(&app_state, room_id, body.player_id, true).await?;

    let interval = app_state.settings.auto_call_interval();
    app_state
        .auto_callers
        .start(app_state.get_ref().clone(), room_id, interval);

    Ok(HttpResponse::Accepted().json(AutoCallResponse {
        room_id,
        running: true,
        interval_ms: Some(app_state.settings.auto_call_interval_ms),
    }))
}

/// DELETE /api/rooms/{room_id}/auto-call?player_id=
async fn stop_auto_call(
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
    query: web::Query<HostQuery>,
) -> Result<HttpResponse, AppError> {
    let room_id = path.into_inner();
    check_auto_call(&app_state, room_id, query.player_id, false).await?;
    app_state.auto_callers.stop(room_id);

    Ok(HttpResponse::Ok().json(AutoCallResponse {
        room_id,
        running: false,
        interval_ms: None,
    }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("").route(web::post().to(create_room)));
    cfg.service(web::resource("/join").route(web::post().to(join_room)));
    cfg.service(web::resource("/{room_id}").route(web::get().to(get_snapshot)));
    cfg.service(
        web::resource("/{room_id}/players/{player_id}/cards")
            .route(web::get().to(get_player_cards)),
    );
    cfg.service(web::resource("/{room_id}/calls").route(web::post().to(append_call)));
    cfg.service(
        web::resource("/{room_id}/cards/{card_id}/marks").route(web::post().to(set_mark)),
    );
    cfg.service(web::resource("/{room_id}/claims").route(web::post().to(submit_claim)));
    cfg.service(web::resource("/{room_id}/reset").route(web::post().to(reset_room)));
    cfg.service(
        web::resource("/{room_id}/auto-call")
            .route(web::post().to(start_auto_call))
            .route(web::delete().to(stop_auto_call)),
    );
}
