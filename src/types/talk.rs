//! Talk record and tag taxonomy

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Question;

/// The two talk flavors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TalkKind {
    /// Pairing flow, ends in a match or a decline
    Matching,
    /// Poll flow, answers are aggregated into statistics
    Survey,
}

impl std::fmt::Display for TalkKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TalkKind::Matching => "matching",
            TalkKind::Survey => "survey",
        };
        write!(f, "{}", name)
    }
}

/// Tag category taxonomy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TagCategory {
    ForSale,
    Housing,
    Services,
    Community,
    Personals,
    Jobs,
    Gigs,
    Resumes,
    Discussion,
    Other,
}

/// Searchable label attached to a talk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub id: String,
    pub name: String,
    pub category: TagCategory,
    pub popularity: u32,
}

impl Tag {
    /// Wrap a plain capture tag; category defaults to Other
    pub fn from_name(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: name.clone(),
            name,
            category: TagCategory::Other,
            popularity: 0,
        }
    }
}

/// A conversational flow: a DAG of questions and answers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Talk {
    pub id: String,
    pub title: String,
    pub author_id: String,
    #[serde(rename = "type")]
    pub kind: TalkKind,
    #[serde(default)]
    pub is_adult: bool,
    pub language: String,
    #[serde(default)]
    pub tags: Vec<Tag>,
    pub questions: Vec<Question>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub is_template: bool,
    #[serde(default)]
    pub usage_count: u64,
}

impl Talk {
    /// Find a question by id (first declaration wins)
    pub fn question(&self, question_id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == question_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_wire_names() {
        assert_eq!(serde_json::to_string(&TalkKind::Matching).unwrap(), "\"matching\"");
        assert_eq!(serde_json::to_string(&TalkKind::Survey).unwrap(), "\"survey\"");
    }

    #[test]
    fn test_tag_category_kebab_case() {
        assert_eq!(serde_json::to_string(&TagCategory::ForSale).unwrap(), "\"for-sale\"");
    }

    #[test]
    fn test_tag_from_name() {
        let tag = Tag::from_name("casual");
        assert_eq!(tag.id, "casual");
        assert_eq!(tag.category, TagCategory::Other);
        assert_eq!(tag.popularity, 0);
    }
}
