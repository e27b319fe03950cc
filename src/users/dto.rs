use serde::Deserialize;

use crate::{
    auth::{dto::non_blank, services::is_valid_email},
    users::repo_types::{ProfileChanges, User, DEFAULT_IMAGE_URL},
};

#[derive(Debug, Deserialize)]
pub struct UserSearch {
    pub q: Option<String>,
}

/// Profile edit form. `password` is the current password, required to apply changes.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct EditProfileForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub password: String,
}

impl EditProfileForm {
    pub fn from_user(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            email: user.email.clone(),
            image_url: Some(user.image_url.clone()),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            password: String::new(),
        }
    }

    pub fn normalize(&mut self) {
        self.username = self.username.trim().to_string();
        self.email = self.email.trim().to_lowercase();
        self.first_name = self.first_name.trim().to_string();
        self.last_name = self.last_name.trim().to_string();
        self.image_url = non_blank(self.image_url.take());
    }

    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.username.is_empty() {
            errors.push("Username is required.".to_string());
        }
        if !is_valid_email(&self.email) {
            errors.push("Invalid email address.".to_string());
        }
        if self.first_name.is_empty() {
            errors.push("First name is required.".to_string());
        }
        if self.last_name.is_empty() {
            errors.push("Last name is required.".to_string());
        }
        if self.password.is_empty() {
            errors.push("Enter your current password to save changes.".to_string());
        }
        errors
    }

    pub fn changes(&self) -> ProfileChanges<'_> {
        ProfileChanges {
            username: &self.username,
            email: &self.email,
            image_url: self.image_url.as_deref().unwrap_or(DEFAULT_IMAGE_URL),
            first_name: &self.first_name,
            last_name: &self.last_name,
        }
    }
}
