use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use crate::core::domain::Identifiable;
use crate::core::library::LoanStatus;
use crate::core::listing::{FilterField, Listable};
use crate::utils::date::serializer;

// Member as embedded in a loan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberRef {
    pub id: String,
    pub name: Option<String>,
    pub phone_number: Option<String>,
}

impl MemberRef {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            name: None,
            phone_number: None,
        }
    }
}

// Copy as embedded in a loan, with the title of its book
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CopyRef {
    pub id: String,
    pub title: Option<String>,
    pub author: Option<String>,
}

impl CopyRef {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            title: None,
            author: None,
        }
    }
}

// LoanEntity groups the copies lent to one member in a single operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanEntity {
    #[serde(default)]
    pub id: String,
    pub member: MemberRef,
    pub book_copies: Vec<CopyRef>,
    #[serde(default, with = "serializer")]
    pub loan_date: Option<NaiveDate>,
    #[serde(default, with = "serializer")]
    pub due_date: Option<NaiveDate>,
    #[serde(default, with = "serializer")]
    pub return_date: Option<NaiveDate>,
    pub status: LoanStatus,
}

impl LoanEntity {
    pub fn new(member_id: &str, copy_ids: &[String], loan_date: NaiveDate, due_date: NaiveDate) -> Self {
        Self {
            id: String::new(),
            member: MemberRef::new(member_id),
            book_copies: copy_ids.iter().map(|id| CopyRef::new(id)).collect(),
            loan_date: Some(loan_date),
            due_date: Some(due_date),
            return_date: None,
            status: LoanStatus::Active,
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = id.to_string();
        self
    }

    pub fn copy_ids(&self) -> Vec<&str> {
        self.book_copies.iter().map(|c| c.id.as_str()).collect()
    }

    pub fn references_copy(&self, copy_id: &str) -> bool {
        self.book_copies.iter().any(|c| c.id == copy_id)
    }

    // title shown for the loan, the first copy's book
    pub fn title(&self) -> Option<&str> {
        self.book_copies.iter().find_map(|c| c.title.as_deref())
    }
}

impl Identifiable for LoanEntity {
    fn id(&self) -> String {
        self.id.to_string()
    }
}

impl Listable for LoanEntity {
    fn search_fields(&self) -> Vec<Option<&str>> {
        let mut fields = vec![self.member.name.as_deref(), self.member.phone_number.as_deref()];
        fields.extend(self.book_copies.iter().map(|c| c.title.as_deref()));
        fields
    }

    fn sort_date(&self) -> Option<NaiveDate> {
        self.loan_date
    }

    fn filter_value(&self, field: FilterField) -> Option<String> {
        match field {
            FilterField::Status => Some(self.status.to_string()),
            _ => None,
        }
    }
}
