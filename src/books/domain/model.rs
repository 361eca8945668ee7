use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use crate::core::domain::Identifiable;
use crate::core::library::{LibraryError, LibraryResult};
use crate::core::listing::{FilterField, Listable};
use crate::utils::date::serializer;

// BookEntity is the catalog title; physical items are tracked as copies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookEntity {
    // empty until the Catalog Store assigns one
    #[serde(default)]
    pub id: String,
    pub title: String,
    pub author: Option<String>,
    pub description: Option<String>,
    pub isbn: Option<String>,
    pub publisher: Option<String>,
    #[serde(default, with = "serializer")]
    pub publication_date: Option<NaiveDate>,
    pub category: Option<String>,
    #[serde(default)]
    pub total_copies: u32,
    #[serde(default)]
    pub available_copies: u32,
}

impl BookEntity {
    pub fn new(title: &str, author: Option<&str>, total_copies: u32) -> Self {
        Self {
            id: String::new(),
            title: title.to_string(),
            author: author.map(str::to_string),
            description: None,
            isbn: None,
            publisher: None,
            publication_date: None,
            category: None,
            total_copies,
            available_copies: total_copies,
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = id.to_string();
        self
    }

    // Form checks, run before anything is sent.
    pub fn validate(&self) -> LibraryResult<()> {
        if self.title.trim().is_empty() {
            return Err(LibraryError::validation("book title is required", Some("title".to_string())));
        }
        if self.available_copies > self.total_copies {
            return Err(LibraryError::validation(
                format!("available copies {} exceed total copies {}",
                        self.available_copies, self.total_copies).as_str(), Some("availableCopies".to_string())));
        }
        Ok(())
    }
}

// Add-book form. Missing `availableCopies` means every copy is on the shelf.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookForm {
    pub title: String,
    pub author: Option<String>,
    pub description: Option<String>,
    pub isbn: Option<String>,
    pub publisher: Option<String>,
    #[serde(default, with = "serializer")]
    pub publication_date: Option<NaiveDate>,
    pub category: Option<String>,
    #[serde(default)]
    pub total_copies: u32,
    pub available_copies: Option<u32>,
}

impl From<BookForm> for BookEntity {
    fn from(form: BookForm) -> Self {
        Self {
            id: String::new(),
            title: form.title,
            author: form.author,
            description: form.description,
            isbn: form.isbn,
            publisher: form.publisher,
            publication_date: form.publication_date,
            category: form.category,
            total_copies: form.total_copies,
            available_copies: form.available_copies.unwrap_or(form.total_copies),
        }
    }
}

impl Identifiable for BookEntity {
    fn id(&self) -> String {
        self.id.to_string()
    }
}

impl Listable for BookEntity {
    fn search_fields(&self) -> Vec<Option<&str>> {
        vec![Some(self.title.as_str()), self.author.as_deref()]
    }

    fn sort_date(&self) -> Option<NaiveDate> {
        self.publication_date
    }

    fn filter_value(&self, field: FilterField) -> Option<String> {
        match field {
            FilterField::Category => self.category.clone(),
            FilterField::Author => self.author.clone(),
            FilterField::Status => None,
        }
    }
}
