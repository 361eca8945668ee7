use std::convert::TryFrom;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use crate::copies::domain::model::{BookRef, CopyEntity};
use crate::core::library::{CopyStatus, LibraryError, LibraryResult};
use crate::gateway::rest::RestResource;
use crate::utils::date::serializer;
use crate::utils::wire::{id, non_blank, number};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookRefDto {
    #[serde(with = "id")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

// CopyDto is the Catalog Store shape of a book copy
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CopyDto {
    #[serde(with = "id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub book: Option<BookRefDto>,
    pub location: Option<String>,
    pub status: Option<String>,
    #[serde(with = "serializer")]
    pub acquisition_date: Option<NaiveDate>,
    #[serde(with = "number")]
    pub condition_rating: Option<i64>,
}

impl From<&CopyEntity> for CopyDto {
    fn from(other: &CopyEntity) -> Self {
        Self {
            id: Some(other.id.to_string()).filter(|id| !id.is_empty()),
            // the store only needs the reference
            book: Some(BookRefDto {
                id: Some(other.book.id.to_string()),
                title: None,
                author: None,
            }),
            location: other.location.clone(),
            status: Some(other.status.to_string()),
            acquisition_date: other.acquisition_date,
            condition_rating: other.condition_rating.map(i64::from),
        }
    }
}

impl TryFrom<CopyDto> for CopyEntity {
    type Error = LibraryError;

    fn try_from(other: CopyDto) -> Result<Self, Self::Error> {
        let id = non_blank(other.id)
            .ok_or_else(|| LibraryError::serialization("copy without id"))?;
        let book = other.book
            .and_then(|b| {
                let book_id = non_blank(b.id)?;
                Some(BookRef {
                    id: book_id,
                    title: non_blank(b.title),
                    author: non_blank(b.author),
                })
            })
            .ok_or_else(|| LibraryError::serialization(format!("copy {} without book", id).as_str()))?;
        let status = other.status.map(CopyStatus::from).unwrap_or(CopyStatus::Unknown);
        let condition_rating = match other.condition_rating {
            None => None,
            Some(r) if (0..=10).contains(&r) => Some(r as u8),
            Some(r) => {
                return Err(LibraryError::serialization(
                    format!("copy {} has condition rating {}", id, r).as_str()));
            }
        };
        Ok(CopyEntity {
            id,
            book,
            location: non_blank(other.location),
            status,
            acquisition_date: other.acquisition_date,
            condition_rating,
        })
    }
}

impl RestResource for CopyEntity {
    type Wire = CopyDto;
    const KIND: &'static str = "book copy";

    fn list_path() -> &'static str {
        "/api/bookCopy/list"
    }

    fn create_path() -> &'static str {
        "/api/bookCopy/add"
    }

    fn update_path(&self) -> Option<String> {
        Some(format!("/api/bookCopy/updateBookCopy/{}", self.id))
    }

    fn delete_path(id: &str) -> Option<String> {
        Some(format!("/api/bookCopy/delete/{}", id))
    }

    fn to_wire(&self) -> CopyDto {
        CopyDto::from(self)
    }

    fn from_wire(wire: CopyDto) -> LibraryResult<Self> {
        CopyEntity::try_from(wire)
    }
}
