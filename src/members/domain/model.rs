use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use crate::core::domain::Identifiable;
use crate::core::library::{LibraryError, LibraryResult};
use crate::core::listing::Listable;
use crate::utils::date::serializer;

// MemberEntity is a registered borrower
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberEntity {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub address: Option<String>,
    pub phone_number: Option<String>,
    #[serde(default, with = "serializer")]
    pub registration_date: Option<NaiveDate>,
    #[serde(default = "active")]
    pub is_active: bool,
}

fn active() -> bool {
    true
}

impl MemberEntity {
    pub fn new(name: &str, phone_number: Option<&str>) -> Self {
        Self {
            id: String::new(),
            name: name.to_string(),
            address: None,
            phone_number: phone_number.map(str::to_string),
            registration_date: None,
            is_active: true,
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = id.to_string();
        self
    }

    pub fn validate(&self) -> LibraryResult<()> {
        if self.name.trim().is_empty() {
            return Err(LibraryError::validation("member name is required", Some("name".to_string())));
        }
        Ok(())
    }
}

impl Identifiable for MemberEntity {
    fn id(&self) -> String {
        self.id.to_string()
    }
}

impl Listable for MemberEntity {
    fn search_fields(&self) -> Vec<Option<&str>> {
        vec![Some(self.name.as_str()), self.phone_number.as_deref()]
    }

    fn sort_date(&self) -> Option<NaiveDate> {
        self.registration_date
    }
}
