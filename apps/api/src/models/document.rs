use serde::{Deserialize, Serialize};

/// Which document the user asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentType {
    Resume,
    #[serde(rename = "Cover Letter")]
    CoverLetter,
}

impl DocumentType {
    /// Display label, also used as the file name prefix.
    pub fn label(&self) -> &'static str {
        match self {
            DocumentType::Resume => "Resume",
            DocumentType::CoverLetter => "Cover Letter",
        }
    }

    /// Download file name: `{label}_{name with spaces as underscores}.{extension}`.
    pub fn file_name(&self, person_name: &str, extension: &str) -> String {
        format!(
            "{}_{}.{extension}",
            self.label(),
            person_name.replace(' ', "_")
        )
    }
}

/// Form fields collected from the user. Missing fields are empty strings;
/// nothing is validated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FormInput {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub role: String,
    pub experience: String,
    pub skills: String,
    pub goals: String,
}
