use std::convert::TryFrom;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use crate::books::domain::model::BookEntity;
use crate::core::library::{LibraryError, LibraryResult};
use crate::gateway::rest::RestResource;
use crate::utils::date::serializer;
use crate::utils::wire::{id, non_blank, number};

// BookDto is the Catalog Store shape of a book
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BookDto {
    #[serde(with = "id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub title: Option<String>,
    pub author: Option<String>,
    pub description: Option<String>,
    pub isbn: Option<String>,
    pub publisher: Option<String>,
    #[serde(with = "serializer")]
    pub publication_date: Option<NaiveDate>,
    pub category: Option<String>,
    #[serde(with = "number")]
    pub total_copies: Option<i64>,
    #[serde(with = "number")]
    pub available_copies: Option<i64>,
}

impl From<&BookEntity> for BookDto {
    fn from(other: &BookEntity) -> Self {
        Self {
            id: Some(other.id.to_string()).filter(|id| !id.is_empty()),
            title: Some(other.title.to_string()),
            author: other.author.clone(),
            description: other.description.clone(),
            isbn: other.isbn.clone(),
            publisher: other.publisher.clone(),
            publication_date: other.publication_date,
            category: other.category.clone(),
            total_copies: Some(other.total_copies as i64),
            available_copies: Some(other.available_copies as i64),
        }
    }
}

impl TryFrom<BookDto> for BookEntity {
    type Error = LibraryError;

    fn try_from(other: BookDto) -> Result<Self, Self::Error> {
        let id = non_blank(other.id)
            .ok_or_else(|| LibraryError::serialization("book without id"))?;
        let title = non_blank(other.title)
            .ok_or_else(|| LibraryError::serialization(format!("book {} without title", id).as_str()))?;
        let total = other.total_copies.unwrap_or(0).max(0) as u32;
        let mut available = other.available_copies.map(|n| n.max(0) as u32).unwrap_or(total);
        if available > total {
            tracing::warn!("book {} reports {} available copies out of {}, clamping", id, available, total);
            available = total;
        }
        Ok(BookEntity {
            id,
            title,
            author: non_blank(other.author),
            description: non_blank(other.description),
            isbn: non_blank(other.isbn),
            publisher: non_blank(other.publisher),
            publication_date: other.publication_date,
            category: non_blank(other.category),
            total_copies: total,
            available_copies: available,
        })
    }
}

impl RestResource for BookEntity {
    type Wire = BookDto;
    const KIND: &'static str = "book";

    fn list_path() -> &'static str {
        "/api/book/listBooks"
    }

    fn create_path() -> &'static str {
        "/api/book/addBook"
    }

    // the book update endpoint reads the id from the body
    fn update_path(&self) -> Option<String> {
        Some("/api/book/updateBook".to_string())
    }

    fn delete_path(id: &str) -> Option<String> {
        Some(format!("/api/book/deleteBook/{}", id))
    }

    fn to_wire(&self) -> BookDto {
        BookDto::from(self)
    }

    fn from_wire(wire: BookDto) -> LibraryResult<Self> {
        BookEntity::try_from(wire)
    }
}
