use serde::Deserialize;

use super::services::is_valid_email;

pub const MIN_PASSWORD_LEN: usize = 6;

/// Signup form body.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct SignupForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl SignupForm {
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
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            errors.push(format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters."
            ));
        }
        if self.first_name.is_empty() {
            errors.push("First name is required.".to_string());
        }
        if self.last_name.is_empty() {
            errors.push("Last name is required.".to_string());
        }
        errors
    }
}

/// Login form body.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.username.trim().is_empty() {
            errors.push("Username is required.".to_string());
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            errors.push(format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters."
            ));
        }
        errors
    }
}

pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> SignupForm {
        SignupForm {
            username: " alice ".into(),
            email: " Alice@X.com ".into(),
            password: "pw12345".into(),
            first_name: "Alice".into(),
            last_name: "Liddell".into(),
            image_url: Some("   ".into()),
        }
    }

    #[test]
    fn normalize_trims_and_drops_blank_image() {
        let mut form = alice();
        form.normalize();
        assert_eq!(form.username, "alice");
        assert_eq!(form.email, "alice@x.com");
        assert_eq!(form.image_url, None);
        assert!(form.validate().is_empty());
    }

    #[test]
    fn short_password_and_bad_email_are_reported() {
        let mut form = alice();
        form.password = "pw".into();
        form.email = "not-an-email".into();
        form.normalize();
        let errors = form.validate();
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().any(|e| e.contains("email")));
        assert!(errors.iter().any(|e| e.contains("at least 6")));
    }

    #[test]
    fn login_requires_both_fields() {
        let form = LoginForm::default();
        assert_eq!(form.validate().len(), 2);
        let form = LoginForm {
            username: "alice".into(),
            password: "pw12345".into(),
        };
        assert!(form.validate().is_empty());
    }
}
