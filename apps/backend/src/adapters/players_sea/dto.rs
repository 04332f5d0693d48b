//! DTOs for players_sea adapter.

#[derive(Debug, Clone)]
pub struct PlayerCreate {
    pub room_id: i64,
    pub display_name: String,
    pub ai_kind: Option<String>,
}

impl PlayerCreate {
    pub fn human(room_id: i64, display_name: impl Into<String>) -> Self {
        Self {
            room_id,
            display_name: display_name.into(),
            ai_kind: None,
        }
    }

    pub fn with_ai_kind(mut self, ai_kind: impl Into<String>) -> Self {
        self.ai_kind = Some(ai_kind.into());
        self
    }
}
