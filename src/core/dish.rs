//! Dish and comment records

use crate::core::error::ValidationError;
use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A dish as served by the dish repository
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dish {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

impl Dish {
    /// Create a dish with only an id and a name
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            image: String::new(),
            category: String::new(),
            featured: false,
            label: String::new(),
            price: String::new(),
            description: String::new(),
            comments: Vec::new(),
        }
    }

    /// Append a comment to the dish
    pub fn add_comment(&mut self, comment: Comment) {
        self.comments.push(comment);
    }
}

/// A user-submitted review attached to a dish
///
/// `date` is captured when the comment is built and is never touched again.
/// It is kept at millisecond precision and serializes as
/// `YYYY-MM-DDTHH:MM:SS.mmmZ`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Comment {
    #[validate(length(min = 2))]
    pub author: String,
    #[validate(range(min = 1, max = 5))]
    pub rating: u8,
    #[validate(length(min = 1))]
    pub comment: String,
    #[serde(with = "iso_date")]
    date: DateTime<Utc>,
}

impl Comment {
    /// Build a comment stamped with the current time
    pub fn new(
        author: impl Into<String>,
        rating: u8,
        comment: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Self::with_date(author, rating, comment, Utc::now())
    }

    /// Build a comment with an explicit timestamp
    pub fn with_date(
        author: impl Into<String>,
        rating: u8,
        comment: impl Into<String>,
        date: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        let comment = Self {
            author: author.into(),
            rating,
            comment: comment.into(),
            date: date.trunc_subsecs(3),
        };

        comment.validate().map_err(|errors| {
            let mut fields: Vec<String> = errors
                .field_errors()
                .keys()
                .map(|field| field.to_string())
                .collect();
            fields.sort();
            ValidationError::InvalidForm { fields }
        })?;

        Ok(comment)
    }

    /// When the comment was submitted
    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    /// The submission date as an ISO-8601 string
    pub fn date_iso(&self) -> String {
        iso_date::format(&self.date)
    }
}

/// Serde adapter writing timestamps the way browsers' `toISOString` does
pub mod iso_date {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn format(date: &DateTime<Utc>) -> String {
        date.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    pub fn serialize<S>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format(date))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|date| date.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
