//! DTOs for cards_sea adapter.

#[derive(Debug, Clone)]
pub struct CardCreate {
    pub room_id: i64,
    pub player_id: i64,
    pub card_no: i16,
    pub layout: sea_orm::JsonValue,
    pub marked_cells: sea_orm::JsonValue,
}

impl CardCreate {
    pub fn new(
        room_id: i64,
        player_id: i64,
        card_no: i16,
        layout: sea_orm::JsonValue,
        marked_cells: sea_orm::JsonValue,
    ) -> Self {
        Self {
            room_id,
            player_id,
            card_no,
            layout,
            marked_cells,
        }
    }
}
