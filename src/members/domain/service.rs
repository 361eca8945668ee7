use std::sync::Arc;
use async_trait::async_trait;
use crate::core::domain::Configuration;
use crate::core::library::{LibraryError, LibraryResult, PaginatedResult};
use crate::core::listing::{apply, ListQuery};
use crate::core::session::SessionContext;
use crate::loans::repository::LoanRepository;
use crate::members::domain::MemberService;
use crate::members::domain::model::MemberEntity;
use crate::members::repository::MemberRepository;

pub struct MemberServiceImpl {
    page_size: usize,
    member_repository: Arc<dyn MemberRepository>,
    loan_repository: Arc<dyn LoanRepository>,
}

impl MemberServiceImpl {
    pub fn new(config: &Configuration, member_repository: Arc<dyn MemberRepository>,
               loan_repository: Arc<dyn LoanRepository>) -> Self {
        Self {
            page_size: config.listing.members_page_size,
            member_repository,
            loan_repository,
        }
    }
}

#[async_trait]
impl MemberService for MemberServiceImpl {
    async fn list_members(&self, ctx: &SessionContext, query: &ListQuery) -> LibraryResult<PaginatedResult<MemberEntity>> {
        ctx.ensure_active()?;
        let members = self.member_repository.list(ctx).await?;
        Ok(apply(&members, query, self.page_size))
    }

    async fn add_member(&self, ctx: &SessionContext, member: &MemberEntity) -> LibraryResult<MemberEntity> {
        member.validate()?;
        ctx.ensure_active()?;
        let created = self.member_repository.create(ctx, member).await?;
        tracing::info!("member {} registered", created.id);
        Ok(created)
    }

    async fn update_member(&self, ctx: &SessionContext, member: &MemberEntity) -> LibraryResult<MemberEntity> {
        member.validate()?;
        if member.id.trim().is_empty() {
            return Err(LibraryError::validation("member id is required", Some("id".to_string())));
        }
        ctx.ensure_active()?;
        self.member_repository.update(ctx, member).await
    }

    async fn remove_member(&self, ctx: &SessionContext, id: &str) -> LibraryResult<()> {
        ctx.ensure_active()?;
        let open = self.loan_repository.list(ctx).await?
            .iter()
            .filter(|l| l.member.id == id && l.status.is_open())
            .count();
        if open > 0 {
            return Err(LibraryError::conflict(
                format!("member {} still has {} open loans", id, open).as_str(), Some("openLoans".to_string())));
        }
        self.member_repository.delete(ctx, id).await?;
        tracing::info!("member {} removed", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use async_once::AsyncOnce;
    use chrono::NaiveDate;
    use lazy_static::lazy_static;
    use crate::copies::domain::model::CopyEntity;
    use crate::core::domain::Configuration;
    use crate::core::library::{CopyStatus, LibraryError};
    use crate::core::listing::{ListQuery, SortOrder};
    use crate::core::session::SessionContext;
    use crate::gateway::factory::memory_handles;
    use crate::gateway::memory::MemoryCatalog;
    use crate::loans::domain::model::LoanEntity;
    use crate::members::domain::MemberService;
    use crate::members::domain::model::MemberEntity;
    use crate::members::factory;

    lazy_static! {
        static ref SUT_SVC: AsyncOnce<Box<dyn MemberService>> = AsyncOnce::new(async {
                let catalog = MemoryCatalog::new();
                let d = |day| NaiveDate::from_ymd_opt(2024, 3, day).unwrap();
                catalog.seed(vec![],
                             vec![CopyEntity::new("B1", None, CopyStatus::Borrowed).with_id("C1")],
                             vec![MemberEntity::new("Busy", None).with_id("M1")],
                             vec![LoanEntity::new("M1", &["C1".to_string()], d(1), d(10)).with_id("L1")]).unwrap();
                factory::create_member_service(&Configuration::new("test"), &memory_handles(catalog))
            });
    }

    fn ctx() -> SessionContext {
        SessionContext::new("token", "U1")
    }

    #[tokio::test]
    async fn test_should_add_and_update_member() {
        let svc = SUT_SVC.get().await;
        let member = svc.add_member(&ctx(), &MemberEntity::new("Zoé Martin", Some("0699887766")))
            .await.expect("should add member");
        assert!(!member.id.is_empty());

        let mut changed = member.clone();
        changed.address = Some("12 rue des Lilas".to_string());
        let updated = svc.update_member(&ctx(), &changed).await.expect("should update member");
        assert_eq!(changed.address, updated.address);

        let page = svc.list_members(&ctx(), &ListQuery::new().with_search("0699").with_sort(SortOrder::Asc))
            .await.unwrap();
        assert_eq!(1, page.total);
        assert_eq!("Zoé Martin", page.records[0].name.as_str());
    }

    #[tokio::test]
    async fn test_should_require_member_name() {
        let svc = SUT_SVC.get().await;
        let err = svc.add_member(&ctx(), &MemberEntity::new("  ", None)).await.unwrap_err();
        assert!(matches!(err, LibraryError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_should_refuse_removing_member_with_open_loan() {
        let svc = SUT_SVC.get().await;
        let err = svc.remove_member(&ctx(), "M1").await.unwrap_err();
        assert!(matches!(err, LibraryError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_should_remove_member() {
        let svc = SUT_SVC.get().await;
        let member = svc.add_member(&ctx(), &MemberEntity::new("Temporaire", None)).await.unwrap();
        svc.remove_member(&ctx(), member.id.as_str()).await.expect("should remove member");
        assert!(matches!(svc.remove_member(&ctx(), member.id.as_str()).await, Err(LibraryError::NotFound { .. })));
    }
}
