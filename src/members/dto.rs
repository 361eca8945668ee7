use std::convert::TryFrom;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use crate::core::library::{LibraryError, LibraryResult};
use crate::gateway::rest::RestResource;
use crate::members::domain::model::MemberEntity;
use crate::utils::date::serializer;
use crate::utils::wire::{id, non_blank};

// MemberDto is the Catalog Store shape of a member
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MemberDto {
    #[serde(with = "id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: Option<String>,
    pub address: Option<String>,
    pub phone_number: Option<String>,
    #[serde(with = "serializer")]
    pub registration_date: Option<NaiveDate>,
    pub is_active: Option<bool>,
}

impl From<&MemberEntity> for MemberDto {
    fn from(other: &MemberEntity) -> Self {
        Self {
            id: Some(other.id.to_string()).filter(|id| !id.is_empty()),
            name: Some(other.name.to_string()),
            address: other.address.clone(),
            phone_number: other.phone_number.clone(),
            registration_date: other.registration_date,
            is_active: Some(other.is_active),
        }
    }
}

impl TryFrom<MemberDto> for MemberEntity {
    type Error = LibraryError;

    fn try_from(other: MemberDto) -> Result<Self, Self::Error> {
        let id = non_blank(other.id)
            .ok_or_else(|| LibraryError::serialization("member without id"))?;
        let name = non_blank(other.name)
            .ok_or_else(|| LibraryError::serialization(format!("member {} without name", id).as_str()))?;
        Ok(MemberEntity {
            id,
            name,
            address: non_blank(other.address),
            phone_number: non_blank(other.phone_number),
            registration_date: other.registration_date,
            is_active: other.is_active.unwrap_or(true),
        })
    }
}

impl RestResource for MemberEntity {
    type Wire = MemberDto;
    const KIND: &'static str = "member";

    fn list_path() -> &'static str {
        "/api/members/listMember"
    }

    fn create_path() -> &'static str {
        "/api/members/addMember"
    }

    fn update_path(&self) -> Option<String> {
        Some(format!("/api/members/update/{}", self.id))
    }

    fn delete_path(id: &str) -> Option<String> {
        Some(format!("/api/members/delete/{}", id))
    }

    fn to_wire(&self) -> MemberDto {
        MemberDto::from(self)
    }

    fn from_wire(wire: MemberDto) -> LibraryResult<Self> {
        MemberEntity::try_from(wire)
    }
}

#[cfg(test)]
mod tests {
    use std::convert::TryFrom;
    use chrono::NaiveDate;
    use crate::core::library::LibraryError;
    use crate::members::domain::model::MemberEntity;
    use crate::members::dto::MemberDto;

    #[tokio::test]
    async fn test_should_parse_member() {
        let dto: MemberDto = serde_json::from_str(r#"{
            "id": 3, "name": "Alice", "phoneNumber": "0611223344",
            "registrationDate": "2024-01-10T09:00:00.000+00:00", "isActive": false
        }"#).unwrap();
        let member = MemberEntity::try_from(dto).unwrap();
        assert_eq!("3", member.id.as_str());
        assert_eq!(NaiveDate::from_ymd_opt(2024, 1, 10), member.registration_date);
        assert!(!member.is_active);
    }

    #[tokio::test]
    async fn test_should_default_member_to_active() {
        let dto: MemberDto = serde_json::from_str(r#"{"id": "m1", "name": "Bruno"}"#).unwrap();
        assert!(MemberEntity::try_from(dto).unwrap().is_active);
        let dto: MemberDto = serde_json::from_str(r#"{"id": "m1"}"#).unwrap();
        assert!(matches!(MemberEntity::try_from(dto), Err(LibraryError::Serialization { .. })));
    }
}
