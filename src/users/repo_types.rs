use sqlx::FromRow;
use time::OffsetDateTime;

pub const DEFAULT_IMAGE_URL: &str = "/static/images/default-pic.svg";

/// User record in the database.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password: String, // argon2 hash, never rendered
    pub image_url: String,
    pub first_name: String,
    pub last_name: String,
    pub created_at: OffsetDateTime,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// Columns written on signup; the password is already hashed.
#[derive(Debug)]
pub struct NewUser<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub image_url: &'a str,
}

#[derive(Debug)]
pub struct ProfileChanges<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub image_url: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
}
