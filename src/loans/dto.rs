use std::convert::TryFrom;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use crate::core::library::{LibraryError, LibraryResult, LoanStatus};
use crate::gateway::rest::RestResource;
use crate::loans::domain::model::{CopyRef, LoanEntity, MemberRef};
use crate::utils::date::serializer;
use crate::utils::wire::{id, non_blank};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LoanMemberDto {
    #[serde(with = "id")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoanBookDto {
    pub title: Option<String>,
    pub author: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoanCopyDto {
    #[serde(with = "id")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub book: Option<LoanBookDto>,
}

// LoanDto is the Catalog Store shape of a loan; memberName and bookTitle are flat
// fallbacks some responses carry instead of the nested records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LoanDto {
    #[serde(with = "id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub member: Option<LoanMemberDto>,
    #[serde(skip_serializing)]
    pub member_name: Option<String>,
    pub book_copies: Option<Vec<LoanCopyDto>>,
    #[serde(skip_serializing)]
    pub book_title: Option<String>,
    #[serde(with = "serializer")]
    pub loan_date: Option<NaiveDate>,
    #[serde(with = "serializer")]
    pub due_date: Option<NaiveDate>,
    #[serde(with = "serializer")]
    pub return_date: Option<NaiveDate>,
    pub status: Option<String>,
}

impl From<&LoanEntity> for LoanDto {
    fn from(other: &LoanEntity) -> Self {
        Self {
            id: Some(other.id.to_string()).filter(|id| !id.is_empty()),
            member: Some(LoanMemberDto {
                id: Some(other.member.id.to_string()),
                name: None,
                phone_number: None,
            }),
            member_name: None,
            book_copies: Some(other.book_copies.iter().map(|c| LoanCopyDto {
                id: Some(c.id.to_string()),
                book: None,
            }).collect()),
            book_title: None,
            loan_date: other.loan_date,
            due_date: other.due_date,
            return_date: other.return_date,
            status: Some(other.status.to_string()),
        }
    }
}

impl TryFrom<LoanDto> for LoanEntity {
    type Error = LibraryError;

    fn try_from(other: LoanDto) -> Result<Self, Self::Error> {
        let id = non_blank(other.id)
            .ok_or_else(|| LibraryError::serialization("loan without id"))?;
        let member_name = non_blank(other.member_name);
        let member = match other.member {
            Some(m) => MemberRef {
                id: non_blank(m.id).unwrap_or_default(),
                name: non_blank(m.name).or(member_name),
                phone_number: non_blank(m.phone_number),
            },
            None => MemberRef {
                id: String::new(),
                name: member_name,
                phone_number: None,
            },
        };
        let mut book_copies = Vec::new();
        for copy in other.book_copies.unwrap_or_default() {
            let copy_id = non_blank(copy.id)
                .ok_or_else(|| LibraryError::serialization(format!("loan {} has a copy without id", id).as_str()))?;
            let book = copy.book.unwrap_or_default();
            book_copies.push(CopyRef {
                id: copy_id,
                title: non_blank(book.title),
                author: non_blank(book.author),
            });
        }
        if let Some(fallback) = non_blank(other.book_title) {
            if let Some(first) = book_copies.first_mut() {
                if first.title.is_none() {
                    first.title = Some(fallback);
                }
            }
        }
        Ok(LoanEntity {
            id,
            member,
            book_copies,
            loan_date: other.loan_date,
            due_date: other.due_date,
            return_date: other.return_date,
            status: other.status.map(LoanStatus::from).unwrap_or(LoanStatus::Unknown),
        })
    }
}

impl RestResource for LoanEntity {
    type Wire = LoanDto;
    const KIND: &'static str = "loan";

    fn list_path() -> &'static str {
        "/api/loan/listLoan"
    }

    fn create_path() -> &'static str {
        "/api/loan/addLoan"
    }

    // loans only change through changeStatus
    fn update_path(&self) -> Option<String> {
        None
    }

    // loans are never deleted
    fn delete_path(_id: &str) -> Option<String> {
        None
    }

    fn to_wire(&self) -> LoanDto {
        LoanDto::from(self)
    }

    fn from_wire(wire: LoanDto) -> LibraryResult<Self> {
        LoanEntity::try_from(wire)
    }
}

#[cfg(test)]
mod tests {
    use std::convert::TryFrom;
    use chrono::NaiveDate;
    use crate::core::library::{LibraryError, LoanStatus};
    use crate::loans::domain::model::LoanEntity;
    use crate::loans::dto::LoanDto;

    #[tokio::test]
    async fn test_should_parse_nested_loan() {
        let dto: LoanDto = serde_json::from_str(r#"{
            "id": 9, "status": "ACTIVE", "loanDate": "2024-03-01", "dueDate": "2024-03-15",
            "member": {"id": 3, "name": "Alice", "phoneNumber": "0611"},
            "bookCopies": [{"id": 5, "book": {"title": "Germinal", "author": "Zola"}}, {"id": "6"}]
        }"#).unwrap();
        let loan = LoanEntity::try_from(dto).unwrap();
        assert_eq!("9", loan.id.as_str());
        assert_eq!("3", loan.member.id.as_str());
        assert_eq!(vec!["5", "6"], loan.copy_ids());
        assert_eq!(Some("Germinal"), loan.title());
        assert_eq!(NaiveDate::from_ymd_opt(2024, 3, 15), loan.due_date);
        assert_eq!(None, loan.return_date);
    }

    #[tokio::test]
    async fn test_should_use_flat_fallbacks() {
        let dto: LoanDto = serde_json::from_str(r#"{
            "id": 9, "status": "Retourné", "memberName": "Bruno", "bookTitle": "Nana",
            "bookCopies": [{"id": 5}], "returnDate": "2024-03-10"
        }"#).unwrap();
        let loan = LoanEntity::try_from(dto).unwrap();
        assert_eq!(Some("Bruno".to_string()), loan.member.name);
        assert_eq!(Some("Nana"), loan.title());
        assert_eq!(LoanStatus::Returned, loan.status);
    }

    #[tokio::test]
    async fn test_should_reject_copy_without_id() {
        let dto: LoanDto = serde_json::from_str(r#"{"id": 9, "bookCopies": [{"book": {}}]}"#).unwrap();
        assert!(matches!(LoanEntity::try_from(dto), Err(LibraryError::Serialization { .. })));
    }

    #[tokio::test]
    async fn test_should_send_references_only() {
        let d = |day| NaiveDate::from_ymd_opt(2024, 3, day).unwrap();
        let loan = LoanEntity::new("3", &["5".to_string(), "6".to_string()], d(1), d(15));
        let json = serde_json::to_value(LoanDto::from(&loan)).unwrap();
        assert_eq!(3, json["member"]["id"]);
        assert_eq!(5, json["bookCopies"][0]["id"]);
        assert_eq!("ACTIVE", json["status"]);
        assert_eq!("2024-03-15", json["dueDate"]);
        assert!(json.get("memberName").is_none());
        assert!(json.get("id").is_none());
    }
}
