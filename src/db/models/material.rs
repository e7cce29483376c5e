use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Category of a safety-education article. Anything outside the two values
/// is rejected at creation and update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MaterialCategory {
    Safety,
    Kesehatan,
}

impl MaterialCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            MaterialCategory::Safety => "Safety",
            MaterialCategory::Kesehatan => "Kesehatan",
        }
    }

    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "Safety" => Some(MaterialCategory::Safety),
            "Kesehatan" => Some(MaterialCategory::Kesehatan),
            _ => None,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MaterialValidationError {
    #[error("All fields are required")]
    MissingFields,

    #[error("Category must be Safety or Kesehatan")]
    InvalidCategory,
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Material {
    pub id: i64,
    pub title: String,
    pub category: String,
    pub description: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Material payload for create and update. Fields are optional so missing
/// ones aggregate into a single validation error.
#[derive(Debug, Deserialize)]
pub struct NewMaterial {
    pub title: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug)]
pub struct ValidatedMaterial {
    pub title: String,
    pub category: MaterialCategory,
    pub description: String,
    pub content: String,
}

impl NewMaterial {
    pub fn validate(self) -> Result<ValidatedMaterial, MaterialValidationError> {
        let (title, category, description, content) =
            match (self.title, self.category, self.description, self.content) {
                (Some(t), Some(cat), Some(d), Some(c))
                    if !t.is_empty() && !cat.is_empty() && !d.is_empty() && !c.is_empty() =>
                {
                    (t, cat, d, c)
                }
                _ => return Err(MaterialValidationError::MissingFields),
            };

        let category = MaterialCategory::parse(&category)
            .ok_or(MaterialValidationError::InvalidCategory)?;

        Ok(ValidatedMaterial {
            title,
            category,
            description,
            content,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(category: &str) -> NewMaterial {
        NewMaterial {
            title: Some("APD dasar".to_string()),
            category: Some(category.to_string()),
            description: Some("Ringkasan".to_string()),
            content: Some("Isi materi".to_string()),
        }
    }

    #[test]
    fn both_categories_accepted() {
        assert_eq!(
            payload("Safety").validate().unwrap().category,
            MaterialCategory::Safety
        );
        assert_eq!(
            payload("Kesehatan").validate().unwrap().category,
            MaterialCategory::Kesehatan
        );
    }

    #[test]
    fn unknown_category_rejected() {
        assert_eq!(
            payload("InvalidValue").validate().unwrap_err(),
            MaterialValidationError::InvalidCategory
        );
        // The gate is case-sensitive about its two exact labels.
        assert_eq!(
            payload("safety").validate().unwrap_err(),
            MaterialValidationError::InvalidCategory
        );
    }

    #[test]
    fn missing_field_aggregates() {
        let mut p = payload("Safety");
        p.content = None;
        assert_eq!(
            p.validate().unwrap_err(),
            MaterialValidationError::MissingFields
        );
    }
}
