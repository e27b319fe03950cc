use sqlx::FromRow;
use time::OffsetDateTime;

/// Playlist row joined with its owner's username.
#[derive(Debug, Clone, FromRow)]
pub struct Playlist {
    pub id: i64,
    pub title: String,
    pub text: String,
    pub user_id: i64,
    pub owner_username: String,
    pub created_at: OffsetDateTime,
}

impl Playlist {
    pub fn is_owned_by(&self, user_id: i64) -> bool {
        self.user_id == user_id
    }
}
