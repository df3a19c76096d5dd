use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Denormalized identity fields carried onto attendance records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DisplayFields {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub affiliation: Option<String>,
}

impl DisplayFields {
    /// Trims every field and drops the ones left empty.
    pub fn normalized(self) -> Self {
        Self {
            full_name: non_blank(self.full_name),
            email: non_blank(self.email),
            affiliation: non_blank(self.affiliation),
        }
    }

    /// Per field, keeps `self` and falls back to `other` where `self` is blank.
    pub fn or(self, other: DisplayFields) -> Self {
        let this = self.normalized();
        let other = other.normalized();
        Self {
            full_name: this.full_name.or(other.full_name),
            email: this.email.or(other.email),
            affiliation: this.affiliation.or(other.affiliation),
        }
    }
}

/// A registrant as known to the registration directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    #[serde(alias = "id")]
    pub participant_id: String,
    pub full_name: Option<String>,
    pub email: Option<String>,
    #[serde(alias = "institution", alias = "class")]
    pub affiliation: Option<String>,
}

impl Participant {
    pub fn display_fields(&self) -> DisplayFields {
        DisplayFields {
            full_name: self.full_name.clone(),
            email: self.email.clone(),
            affiliation: self.affiliation.clone(),
        }
        .normalized()
    }
}

/// Name used for ordering and rendering; falls back to the id.
pub fn display_name<'a>(full_name: Option<&'a str>, participant_id: &'a str) -> &'a str {
    full_name
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or(participant_id)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
