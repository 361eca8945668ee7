use std::sync::Arc;
use async_trait::async_trait;
use crate::books::repository::BookRepository;
use crate::copies::repository::CopyRepository;
use crate::core::domain::{Configuration, ListingOptions};
use crate::core::library::{LibraryResult, LoanStatus, PaginatedResult};
use crate::core::listing::{apply, ListQuery, paginate};
use crate::core::repository::find_by_id;
use crate::core::session::SessionContext;
use crate::loans::domain::LoanService;
use crate::loans::domain::lifecycle::{check_invariants, dashboard, DashboardView, ensure_copies_available,
                                      InvariantViolation, LoanView, member_loan_rows, MemberLoanRow, NewLoan,
                                      validate_new_loan, view};
use crate::loans::repository::LoanRepository;
use crate::members::repository::MemberRepository;
use crate::utils::date::today;

pub struct LoanServiceImpl {
    listing: ListingOptions,
    book_repository: Arc<dyn BookRepository>,
    copy_repository: Arc<dyn CopyRepository>,
    member_repository: Arc<dyn MemberRepository>,
    loan_repository: Arc<dyn LoanRepository>,
}

impl LoanServiceImpl {
    pub fn new(config: &Configuration, book_repository: Arc<dyn BookRepository>,
               copy_repository: Arc<dyn CopyRepository>, member_repository: Arc<dyn MemberRepository>,
               loan_repository: Arc<dyn LoanRepository>) -> Self {
        Self {
            listing: config.listing.clone(),
            book_repository,
            copy_repository,
            member_repository,
            loan_repository,
        }
    }
}

#[async_trait]
impl LoanService for LoanServiceImpl {
    async fn create_loan(&self, ctx: &SessionContext, req: &NewLoan) -> LibraryResult<LoanView> {
        let loan = validate_new_loan(req)?;
        ctx.ensure_active()?;
        let copies = self.copy_repository.list(ctx).await?;
        ensure_copies_available(&loan.copy_ids(), &copies)?;

        // one grouped request; a failure leaves nothing applied on our side
        let created = self.loan_repository.create(ctx, &loan).await.map_err(|err| {
            tracing::error!("loan creation failed for member {} copies {:?}: {}",
                loan.member.id, loan.copy_ids(), err);
            err
        })?;
        tracing::info!("loan {} created for member {} with {} copies",
            created.id, created.member.id, created.book_copies.len());
        Ok(view(&created, today()))
    }

    async fn mark_returned(&self, ctx: &SessionContext, id: &str) -> LibraryResult<LoanView> {
        ctx.ensure_active()?;
        let loans = self.loan_repository.list(ctx).await?;
        let loan = find_by_id(&loans, "loan", id)?;
        if loan.status == LoanStatus::Returned {
            tracing::warn!("loan {} already returned on {:?}", loan.id, loan.return_date);
            return Ok(view(&loan, today()));
        }
        let updated = self.loan_repository.change_status(ctx, id, LoanStatus::Returned).await?;
        tracing::info!("loan {} returned", updated.id);
        Ok(view(&updated, today()))
    }

    async fn list_loans(&self, ctx: &SessionContext, query: &ListQuery) -> LibraryResult<PaginatedResult<LoanView>> {
        ctx.ensure_active()?;
        let today = today();
        let views: Vec<LoanView> = self.loan_repository.list(ctx).await?
            .iter()
            .map(|l| view(l, today))
            .collect();
        Ok(apply(&views, query, self.listing.loans_page_size))
    }

    async fn member_loans(&self, ctx: &SessionContext, query: &ListQuery) -> LibraryResult<PaginatedResult<MemberLoanRow>> {
        ctx.ensure_active()?;
        let (members, loans) = tokio::try_join!(
            self.member_repository.list(ctx),
            self.loan_repository.list(ctx))?;
        let rows = member_loan_rows(&members, &loans, query, today());
        Ok(paginate(rows, query.page, self.listing.loans_page_size))
    }

    async fn loans_of_member(&self, ctx: &SessionContext, member_id: &str) -> LibraryResult<Vec<LoanView>> {
        ctx.ensure_active()?;
        let (members, loans) = tokio::try_join!(
            self.member_repository.list(ctx),
            self.loan_repository.list(ctx))?;
        let member = find_by_id(&members, "member", member_id)?;
        let today = today();
        Ok(loans.iter()
            .filter(|l| l.member.id == member.id)
            .map(|l| view(l, today))
            .collect())
    }

    async fn dashboard(&self, ctx: &SessionContext) -> LibraryResult<DashboardView> {
        ctx.ensure_active()?;
        let (books, copies, members, loans) = tokio::try_join!(
            self.book_repository.list(ctx),
            self.copy_repository.list(ctx),
            self.member_repository.list(ctx),
            self.loan_repository.list(ctx))?;
        Ok(dashboard(books.len(), copies.len(), &members, &loans,
                     self.listing.recent_activity_limit, today()))
    }

    async fn audit(&self, ctx: &SessionContext) -> LibraryResult<Vec<InvariantViolation>> {
        ctx.ensure_active()?;
        let (copies, loans) = tokio::try_join!(
            self.copy_repository.list(ctx),
            self.loan_repository.list(ctx))?;
        let violations = check_invariants(&loans, &copies);
        if !violations.is_empty() {
            tracing::warn!("{} loan/copy inconsistencies found", violations.len());
        }
        Ok(violations)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use crate::books::domain::model::BookEntity;
    use crate::copies::domain::model::CopyEntity;
    use crate::core::domain::Configuration;
    use crate::core::library::{CopyStatus, LibraryError, LoanStatus};
    use crate::core::listing::ListQuery;
    use crate::core::loader::Loader;
    use crate::core::repository::{Repository, RepositoryStore};
    use crate::core::session::SessionContext;
    use crate::gateway::factory::memory_handles;
    use crate::gateway::memory::MemoryCatalog;
    use crate::loans::domain::LoanService;
    use crate::loans::domain::lifecycle::NewLoan;
    use crate::loans::domain::model::LoanEntity;
    use crate::loans::factory;
    use crate::members::domain::model::MemberEntity;
    use crate::utils::date::today;

    fn ctx() -> SessionContext {
        SessionContext::new("token", "U1")
    }

    fn seeded() -> (MemoryCatalog, Box<dyn LoanService>) {
        let catalog = MemoryCatalog::new();
        catalog.seed(
            vec![BookEntity::new("Germinal", Some("Zola"), 2).with_id("B1")],
            vec![
                CopyEntity::new("B1", Some("A1"), CopyStatus::Available).with_id("C1"),
                CopyEntity::new("B1", Some("A2"), CopyStatus::Available).with_id("C2"),
            ],
            vec![MemberEntity::new("Alice", Some("0611")).with_id("M1")],
            vec![]).unwrap();
        let config = Configuration::new("http://unused").with_store(RepositoryStore::Memory);
        let svc = factory::create_loan_service(&config, &memory_handles(catalog.clone()));
        (catalog, svc)
    }

    fn new_loan(copies: &[&str]) -> NewLoan {
        NewLoan::new("M1", copies, today(), today() + Duration::days(14))
    }

    #[tokio::test]
    async fn test_should_create_and_return_loan() {
        let (_, svc) = seeded();
        let created = svc.create_loan(&ctx(), &new_loan(&["C1", "C2"])).await.expect("should create loan");
        assert_eq!(LoanStatus::Active, created.loan.status);
        assert_eq!("En cours", created.status_label.as_str());
        assert!(svc.audit(&ctx()).await.unwrap().is_empty());

        let board = svc.dashboard(&ctx()).await.unwrap();
        assert_eq!(1, board.open_loans_count);
        assert_eq!(2, board.book_copies_count);

        let returned = svc.mark_returned(&ctx(), created.loan.id.as_str()).await.expect("should return loan");
        assert_eq!(LoanStatus::Returned, returned.loan.status);
        assert_eq!(Some(today()), returned.loan.return_date);
        assert!(svc.audit(&ctx()).await.unwrap().is_empty());

        // copies are free again
        let again = svc.create_loan(&ctx(), &new_loan(&["C1"])).await;
        assert!(again.is_ok());
    }

    async fn copy_status(catalog: &MemoryCatalog, id: &str) -> CopyStatus {
        let copies = Repository::<CopyEntity>::list(catalog, &ctx()).await.unwrap();
        copies.iter().find(|c| c.id == id).map(|c| c.status).unwrap()
    }

    #[tokio::test]
    async fn test_should_borrow_and_release_only_loaned_copy() {
        let (catalog, svc) = seeded();
        let created = svc.create_loan(&ctx(), &new_loan(&["C1"])).await.expect("should create loan");
        assert_eq!(CopyStatus::Borrowed, copy_status(&catalog, "C1").await);
        assert_eq!(CopyStatus::Available, copy_status(&catalog, "C2").await);

        let _ = svc.mark_returned(&ctx(), created.loan.id.as_str()).await.expect("should return loan");
        assert_eq!(CopyStatus::Available, copy_status(&catalog, "C1").await);
        assert_eq!(CopyStatus::Available, copy_status(&catalog, "C2").await);
    }

    #[tokio::test]
    async fn test_should_load_dashboard_view() {
        let (_, svc) = seeded();
        let loader = Loader::new();
        let state = loader.load(svc.dashboard(&ctx())).await;
        assert_eq!(Some(2), state.data.as_ref().map(|board| board.book_copies_count));

        let _ = svc.create_loan(&ctx(), &new_loan(&["C2"])).await.unwrap();
        let state = loader.load(svc.dashboard(&SessionContext::new("", "U1"))).await;
        // the failed refresh keeps the last board
        assert!(matches!(state.error, Some(LibraryError::Auth { .. })));
        assert_eq!(Some(0), state.data.as_ref().map(|board| board.open_loans_count));

        let state = loader.load(svc.dashboard(&ctx())).await;
        assert!(state.error.is_none());
        assert_eq!(Some(1), state.data.map(|board| board.open_loans_count));
    }

    #[tokio::test]
    async fn test_should_return_loan_only_once() {
        let (_, svc) = seeded();
        let created = svc.create_loan(&ctx(), &new_loan(&["C1"])).await.unwrap();
        let first = svc.mark_returned(&ctx(), created.loan.id.as_str()).await.unwrap();
        let second = svc.mark_returned(&ctx(), created.loan.id.as_str()).await.unwrap();
        assert_eq!(first.loan.return_date, second.loan.return_date);
        assert_eq!(LoanStatus::Returned, second.loan.status);
    }

    #[tokio::test]
    async fn test_should_reject_unavailable_copy_without_mutation() {
        let (catalog, svc) = seeded();
        let _ = svc.create_loan(&ctx(), &new_loan(&["C1"])).await.unwrap();
        let err = svc.create_loan(&ctx(), &new_loan(&["C2", "C1"])).await.unwrap_err();
        assert!(matches!(err, LibraryError::Conflict { .. }));

        let ctx = ctx();
        let loans = Repository::<LoanEntity>::list(&catalog, &ctx).await.unwrap();
        assert_eq!(1, loans.len());
        let copies = Repository::<CopyEntity>::list(&catalog, &ctx).await.unwrap();
        let c2 = copies.iter().find(|c| c.id == "C2").unwrap();
        assert_eq!(CopyStatus::Available, c2.status);
    }

    #[tokio::test]
    async fn test_should_reject_duplicate_copies_before_any_call() {
        let (_, svc) = seeded();
        // an expired session would fail the first call, so validation must come first
        let expired = SessionContext::issued_at("token", "U1", Utc::now() - Duration::hours(25));
        let err = svc.create_loan(&expired, &new_loan(&["C1", "C1"])).await.unwrap_err();
        assert!(matches!(err, LibraryError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_should_require_active_session() {
        let (_, svc) = seeded();
        let err = svc.list_loans(&SessionContext::new("", "U1"), &ListQuery::new()).await.unwrap_err();
        assert!(matches!(err, LibraryError::Auth { .. }));
    }

    #[tokio::test]
    async fn test_should_not_find_unknown_loan() {
        let (_, svc) = seeded();
        let err = svc.mark_returned(&ctx(), "nope").await.unwrap_err();
        assert!(matches!(err, LibraryError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_should_list_loans_by_member() {
        let (_, svc) = seeded();
        let _ = svc.create_loan(&ctx(), &new_loan(&["C1"])).await.unwrap();
        let rows = svc.member_loans(&ctx(), &ListQuery::new()).await.unwrap();
        assert_eq!(1, rows.total);
        assert_eq!(1, rows.records[0].open_loans);

        let loans = svc.loans_of_member(&ctx(), "M1").await.unwrap();
        assert_eq!(1, loans.len());
        assert_eq!(Some("Germinal"), loans[0].loan.title());
        assert!(matches!(svc.loans_of_member(&ctx(), "M9").await, Err(LibraryError::NotFound { .. })));

        let page = svc.list_loans(&ctx(), &ListQuery::new().with_search("germ")).await.unwrap();
        assert_eq!(1, page.records.len());
        let page = svc.list_loans(&ctx(), &ListQuery::new().with_status("RETURNED")).await.unwrap();
        assert!(page.records.is_empty());
    }
}
