use serde::Deserialize;

#[derive(Debug, Default, Clone, Deserialize)]
pub struct NewPlaylistForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub text: String,
}

impl NewPlaylistForm {
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.title.trim().is_empty() {
            errors.push("Title is required.".to_string());
        }
        if self.text.trim().is_empty() {
            errors.push("Text is required.".to_string());
        }
        errors
    }
}
