use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use crate::core::domain::Identifiable;
use crate::core::library::{CopyStatus, LibraryError, LibraryResult};
use crate::core::listing::{FilterField, Listable};
use crate::utils::date::serializer;

pub const MAX_CONDITION_RATING: u8 = 10;

// Book as embedded in a copy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookRef {
    pub id: String,
    pub title: Option<String>,
    pub author: Option<String>,
}

impl BookRef {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            title: None,
            author: None,
        }
    }
}

fn available() -> CopyStatus {
    CopyStatus::Available
}

// CopyEntity is one physical item of a book
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CopyEntity {
    #[serde(default)]
    pub id: String,
    pub book: BookRef,
    pub location: Option<String>,
    #[serde(default = "available")]
    pub status: CopyStatus,
    #[serde(default, with = "serializer")]
    pub acquisition_date: Option<NaiveDate>,
    // 10 Neuf, 8 Bon état, 6 Usagé, 4 Mauvais état
    pub condition_rating: Option<u8>,
}

impl CopyEntity {
    pub fn new(book_id: &str, location: Option<&str>, status: CopyStatus) -> Self {
        Self {
            id: String::new(),
            book: BookRef::new(book_id),
            location: location.map(str::to_string),
            status,
            acquisition_date: None,
            condition_rating: None,
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = id.to_string();
        self
    }

    pub fn is_available(&self) -> bool {
        self.status == CopyStatus::Available
    }

    pub fn validate(&self) -> LibraryResult<()> {
        if self.book.id.trim().is_empty() {
            return Err(LibraryError::validation("copy must reference a book", Some("book".to_string())));
        }
        if let Some(rating) = self.condition_rating {
            if rating > MAX_CONDITION_RATING {
                return Err(LibraryError::validation(
                    format!("condition rating {} above {}", rating, MAX_CONDITION_RATING).as_str(),
                    Some("conditionRating".to_string())));
            }
        }
        Ok(())
    }
}

impl Identifiable for CopyEntity {
    fn id(&self) -> String {
        self.id.to_string()
    }
}

impl Listable for CopyEntity {
    fn search_fields(&self) -> Vec<Option<&str>> {
        vec![self.book.title.as_deref(), self.book.author.as_deref()]
    }

    fn sort_date(&self) -> Option<NaiveDate> {
        self.acquisition_date
    }

    fn filter_value(&self, field: FilterField) -> Option<String> {
        match field {
            FilterField::Status => Some(self.status.to_string()),
            FilterField::Author => self.book.author.clone(),
            FilterField::Category => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::copies::domain::model::CopyEntity;
    use crate::core::library::{CopyStatus, LibraryError};

    #[tokio::test]
    async fn test_should_validate_copy() {
        let mut copy = CopyEntity::new("b1", Some("A3"), CopyStatus::Available);
        copy.condition_rating = Some(8);
        assert!(copy.validate().is_ok());
        assert!(copy.is_available());

        copy.condition_rating = Some(11);
        assert!(matches!(copy.validate(), Err(LibraryError::Validation { .. })));

        let copy = CopyEntity::new("", None, CopyStatus::Available);
        assert!(matches!(copy.validate(), Err(LibraryError::Validation { .. })));
    }
}
