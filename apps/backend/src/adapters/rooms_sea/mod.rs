//! SeaORM adapter for rooms - generic over ConnectionTrait.

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, Set,
};
use time::OffsetDateTime;

use crate::entities::rooms;

pub mod dto;

pub use dto::{RoomCreate, RoomReset, RoomResetConfig};

// Adapter functions return DbErr; repos layer maps to DomainError via From<DbErr>.

/// Apply an update guarded by the room version, then refetch.
///
/// Increments `version` and `updated_at`, filters on id and expected
/// version, and on zero rows distinguishes a missing room from a lost race
/// (`OPTIMISTIC_LOCK:` payload).
async fn optimistic_update_then_fetch<C, F>(
    conn: &C,
    id: i64,
    expected_version: i32,
    configure_update: F,
) -> Result<rooms::Model, sea_orm::DbErr>
where
    C: ConnectionTrait + Send + Sync,
    F: FnOnce(sea_orm::UpdateMany<rooms::Entity>) -> sea_orm::UpdateMany<rooms::Entity>,
{
    let now = OffsetDateTime::now_utc();

    let result = configure_update(rooms::Entity::update_many())
        .col_expr(rooms::Column::UpdatedAt, Expr::val(now).into())
        .col_expr(
            rooms::Column::Version,
            Expr::col(rooms::Column::Version).add(1),
        )
        .filter(rooms::Column::Id.eq(id))
        .filter(rooms::Column::Version.eq(expected_version))
        .exec(conn)
        .await?;

    if result.rows_affected == 0 {
        return match find_by_id(conn, id).await? {
            Some(room) => Err(sea_orm::DbErr::Custom(format!(
                "OPTIMISTIC_LOCK:{{\"expected\":{},\"actual\":{}}}",
                expected_version, room.version
            ))),
            None => Err(room_not_found(id)),
        };
    }

    require_room(conn, id).await
}

fn room_not_found(id: i64) -> sea_orm::DbErr {
    sea_orm::DbErr::Custom(format!("ROOM_NOT_FOUND:{id}"))
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    room_id: i64,
) -> Result<Option<rooms::Model>, sea_orm::DbErr> {
    rooms::Entity::find_by_id(room_id).one(conn).await
}

/// Find room by ID or fail with a `ROOM_NOT_FOUND:` payload.
pub async fn require_room<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    room_id: i64,
) -> Result<rooms::Model, sea_orm::DbErr> {
    find_by_id(conn, room_id)
        .await?
        .ok_or_else(|| room_not_found(room_id))
}

pub async fn find_by_code<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    room_code: &str,
) -> Result<Option<rooms::Model>, sea_orm::DbErr> {
    rooms::Entity::find()
        .filter(rooms::Column::RoomCode.eq(room_code))
        .one(conn)
        .await
}

pub async fn create_room<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: RoomCreate,
) -> Result<rooms::Model, sea_orm::DbErr> {
    let now = OffsetDateTime::now_utc();
    let room = rooms::ActiveModel {
        id: NotSet,
        room_code: Set(dto.room_code),
        host_player_id: Set(None),
        game_type: Set(dto.game_type),
        win_mode: Set(dto.win_mode),
        pattern: Set(dto.pattern),
        prize_value: Set(dto.prize_value),
        game_no: Set(1),
        rng_seed: Set(dto.rng_seed),
        winner_player_id: Set(None),
        window_opened_at: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        version: Set(1),
    };

    room.insert(conn).await
}

pub async fn set_host<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    room_id: i64,
    expected_version: i32,
    host_player_id: i64,
) -> Result<rooms::Model, sea_orm::DbErr> {
    optimistic_update_then_fetch(conn, room_id, expected_version, |update| {
        update.col_expr(
            rooms::Column::HostPlayerId,
            Expr::val(Some(host_player_id)).into(),
        )
    })
    .await
}

/// Bump the version only if nobody else has since `expected_version`.
///
/// Claims and appended calls use this as their serialisation point: of two
/// racing writers the second fails with `OPTIMISTIC_LOCK` and retries against
/// the committed state.
pub async fn bump_version<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    room_id: i64,
    expected_version: i32,
) -> Result<rooms::Model, sea_orm::DbErr> {
    optimistic_update_then_fetch(conn, room_id, expected_version, |update| update).await
}

/// Unconditional version bump for a player joining, so the snapshot ETag
/// changes when the leaderboard gains a row.
pub async fn touch<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    room_id: i64,
) -> Result<(), sea_orm::DbErr> {
    let result = rooms::Entity::update_many()
        .col_expr(
            rooms::Column::UpdatedAt,
            Expr::val(OffsetDateTime::now_utc()).into(),
        )
        .col_expr(
            rooms::Column::Version,
            Expr::col(rooms::Column::Version).add(1),
        )
        .filter(rooms::Column::Id.eq(room_id))
        .exec(conn)
        .await?;
    if result.rows_affected == 0 {
        return Err(room_not_found(room_id));
    }
    Ok(())
}

/// Set the displayed winner only if none is set yet.
///
/// Returns `true` if this caller set it. `window_opened_at` is written in the
/// same statement so the two never disagree.
pub async fn set_winner_if_absent<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    room_id: i64,
    player_id: i64,
    window_opened_at: Option<OffsetDateTime>,
) -> Result<bool, sea_orm::DbErr> {
    let result = rooms::Entity::update_many()
        .col_expr(
            rooms::Column::WinnerPlayerId,
            Expr::val(Some(player_id)).into(),
        )
        .col_expr(
            rooms::Column::WindowOpenedAt,
            Expr::val(window_opened_at).into(),
        )
        .filter(rooms::Column::Id.eq(room_id))
        .filter(rooms::Column::WinnerPlayerId.is_null())
        .exec(conn)
        .await?;
    Ok(result.rows_affected == 1)
}

pub async fn apply_reset<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: RoomReset,
) -> Result<rooms::Model, sea_orm::DbErr> {
    optimistic_update_then_fetch(conn, dto.id, dto.expected_version, |mut update| {
        update = update
            .col_expr(rooms::Column::GameNo, Expr::val(dto.next_game_no).into())
            .col_expr(rooms::Column::WinnerPlayerId, Expr::val(None::<i64>).into())
            .col_expr(
                rooms::Column::WindowOpenedAt,
                Expr::val(None::<OffsetDateTime>).into(),
            );
        if let Some(config) = dto.config {
            update = update
                .col_expr(rooms::Column::WinMode, Expr::val(config.win_mode).into())
                .col_expr(rooms::Column::Pattern, Expr::val(config.pattern).into())
                .col_expr(
                    rooms::Column::PrizeValue,
                    Expr::val(config.prize_value).into(),
                );
        }
        update
    })
    .await
}
