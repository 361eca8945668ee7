use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};
use async_trait::async_trait;
use uuid::Uuid;
use crate::auth::dto::{Credentials, LoginResponse, RegistrationDto, UserProfile};
use crate::auth::repository::AuthRepository;
use crate::books::domain::model::BookEntity;
use crate::books::repository::BookRepository;
use crate::copies::domain::model::CopyEntity;
use crate::copies::repository::CopyRepository;
use crate::core::library::{CopyStatus, LibraryError, LibraryResult, LoanStatus};
use crate::core::repository::Repository;
use crate::core::session::SessionContext;
use crate::loans::domain::model::LoanEntity;
use crate::loans::repository::LoanRepository;
use crate::members::domain::model::MemberEntity;
use crate::members::repository::MemberRepository;
use crate::utils::date::today;

#[derive(Debug, Clone)]
struct Account {
    profile: UserProfile,
    password: String,
}

#[derive(Debug, Default)]
struct CatalogState {
    books: Vec<BookEntity>,
    copies: Vec<CopyEntity>,
    members: Vec<MemberEntity>,
    loans: Vec<LoanEntity>,
    accounts: Vec<Account>,
}

impl CatalogState {
    fn book_available_delta(&mut self, book_id: &str, delta: i64) {
        if let Some(book) = self.books.iter_mut().find(|b| b.id == book_id) {
            let next = (book.available_copies as i64 + delta).clamp(0, book.total_copies as i64);
            book.available_copies = next as u32;
        }
    }

    fn set_copy_status(&mut self, copy_id: &str, status: CopyStatus) {
        let mut book_id = None;
        if let Some(copy) = self.copies.iter_mut().find(|c| c.id == copy_id) {
            if copy.status != status {
                book_id = Some((copy.book.id.to_string(), copy.status));
                copy.status = status;
            }
        }
        if let Some((book_id, previous)) = book_id {
            if previous == CopyStatus::Available {
                self.book_available_delta(book_id.as_str(), -1);
            } else if status == CopyStatus::Available {
                self.book_available_delta(book_id.as_str(), 1);
            }
        }
    }

    // fills the embedded book fields the way the Catalog Store joins them
    fn embed_book(&self, copy: &mut CopyEntity) {
        if let Some(book) = self.books.iter().find(|b| b.id == copy.book.id) {
            copy.book.title = Some(book.title.to_string());
            copy.book.author = book.author.clone();
        }
    }

    fn embed_loan(&self, loan: &mut LoanEntity) {
        if let Some(member) = self.members.iter().find(|m| m.id == loan.member.id) {
            loan.member.name = Some(member.name.to_string());
            loan.member.phone_number = member.phone_number.clone();
        }
        for copy_ref in loan.book_copies.iter_mut() {
            if let Some(copy) = self.copies.iter().find(|c| c.id == copy_ref.id) {
                copy_ref.title = copy.book.title.clone();
                copy_ref.author = copy.book.author.clone();
            }
        }
    }
}

/// In-process stand-in for the Catalog Store.
///
/// It applies the same side effects the real store applies: a new loan marks its copies
/// BORROWED, returning a loan stamps `returnDate` and frees its copies, and the book's
/// available count follows its copies.
#[derive(Clone, Default)]
pub struct MemoryCatalog {
    state: Arc<Mutex<CatalogState>>,
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> LibraryResult<MutexGuard<'_, CatalogState>> {
        self.state.lock()
            .map_err(|err| LibraryError::runtime(format!("memory catalog lock poisoned {}", err).as_str(), None))
    }

    // Stores records as given, keeping their ids; used to set up a known catalog.
    pub fn seed(&self, books: Vec<BookEntity>, copies: Vec<CopyEntity>,
                members: Vec<MemberEntity>, loans: Vec<LoanEntity>) -> LibraryResult<()> {
        let mut state = self.lock()?;
        state.books.extend(books);
        state.members.extend(members);
        for mut copy in copies {
            state.embed_book(&mut copy);
            state.copies.push(copy);
        }
        for mut loan in loans {
            state.embed_loan(&mut loan);
            state.loans.push(loan);
        }
        Ok(())
    }
}

#[async_trait]
impl Repository<BookEntity> for MemoryCatalog {
    async fn list(&self, _ctx: &SessionContext) -> LibraryResult<Vec<BookEntity>> {
        Ok(self.lock()?.books.clone())
    }

    async fn create(&self, _ctx: &SessionContext, entity: &BookEntity) -> LibraryResult<BookEntity> {
        let mut state = self.lock()?;
        let mut book = entity.clone();
        book.id = new_id();
        state.books.push(book.clone());
        Ok(book)
    }

    async fn update(&self, _ctx: &SessionContext, entity: &BookEntity) -> LibraryResult<BookEntity> {
        let mut state = self.lock()?;
        let book = state.books.iter_mut().find(|b| b.id == entity.id)
            .ok_or_else(|| LibraryError::not_found(format!("book {} not found", entity.id).as_str()))?;
        *book = entity.clone();
        Ok(entity.clone())
    }

    async fn delete(&self, _ctx: &SessionContext, id: &str) -> LibraryResult<()> {
        let mut state = self.lock()?;
        let before = state.books.len();
        state.books.retain(|b| b.id != id);
        if state.books.len() == before {
            return Err(LibraryError::not_found(format!("book {} not found", id).as_str()));
        }
        Ok(())
    }
}

impl BookRepository for MemoryCatalog {}

#[async_trait]
impl Repository<CopyEntity> for MemoryCatalog {
    async fn list(&self, _ctx: &SessionContext) -> LibraryResult<Vec<CopyEntity>> {
        Ok(self.lock()?.copies.clone())
    }

    async fn create(&self, _ctx: &SessionContext, entity: &CopyEntity) -> LibraryResult<CopyEntity> {
        let mut state = self.lock()?;
        if !state.books.iter().any(|b| b.id == entity.book.id) {
            return Err(LibraryError::not_found(format!("book {} not found", entity.book.id).as_str()));
        }
        let mut copy = entity.clone();
        copy.id = new_id();
        state.embed_book(&mut copy);
        state.copies.push(copy.clone());
        Ok(copy)
    }

    async fn update(&self, _ctx: &SessionContext, entity: &CopyEntity) -> LibraryResult<CopyEntity> {
        let mut state = self.lock()?;
        if !state.copies.iter().any(|c| c.id == entity.id) {
            return Err(LibraryError::not_found(format!("book copy {} not found", entity.id).as_str()));
        }
        state.set_copy_status(entity.id.as_str(), entity.status);
        let mut updated = entity.clone();
        state.embed_book(&mut updated);
        if let Some(copy) = state.copies.iter_mut().find(|c| c.id == entity.id) {
            *copy = updated.clone();
        }
        Ok(updated)
    }

    async fn delete(&self, _ctx: &SessionContext, id: &str) -> LibraryResult<()> {
        let mut state = self.lock()?;
        let before = state.copies.len();
        state.copies.retain(|c| c.id != id);
        if state.copies.len() == before {
            return Err(LibraryError::not_found(format!("book copy {} not found", id).as_str()));
        }
        Ok(())
    }
}

impl CopyRepository for MemoryCatalog {}

#[async_trait]
impl Repository<MemberEntity> for MemoryCatalog {
    async fn list(&self, _ctx: &SessionContext) -> LibraryResult<Vec<MemberEntity>> {
        Ok(self.lock()?.members.clone())
    }

    async fn create(&self, _ctx: &SessionContext, entity: &MemberEntity) -> LibraryResult<MemberEntity> {
        let mut state = self.lock()?;
        let mut member = entity.clone();
        member.id = new_id();
        if member.registration_date.is_none() {
            member.registration_date = Some(today());
        }
        state.members.push(member.clone());
        Ok(member)
    }

    async fn update(&self, _ctx: &SessionContext, entity: &MemberEntity) -> LibraryResult<MemberEntity> {
        let mut state = self.lock()?;
        let member = state.members.iter_mut().find(|m| m.id == entity.id)
            .ok_or_else(|| LibraryError::not_found(format!("member {} not found", entity.id).as_str()))?;
        *member = entity.clone();
        Ok(entity.clone())
    }

    async fn delete(&self, _ctx: &SessionContext, id: &str) -> LibraryResult<()> {
        let mut state = self.lock()?;
        let before = state.members.len();
        state.members.retain(|m| m.id != id);
        if state.members.len() == before {
            return Err(LibraryError::not_found(format!("member {} not found", id).as_str()));
        }
        Ok(())
    }
}

impl MemberRepository for MemoryCatalog {}

#[async_trait]
impl Repository<LoanEntity> for MemoryCatalog {
    async fn list(&self, _ctx: &SessionContext) -> LibraryResult<Vec<LoanEntity>> {
        Ok(self.lock()?.loans.clone())
    }

    async fn create(&self, _ctx: &SessionContext, entity: &LoanEntity) -> LibraryResult<LoanEntity> {
        let mut state = self.lock()?;
        if !state.members.iter().any(|m| m.id == entity.member.id) {
            return Err(LibraryError::not_found(format!("member {} not found", entity.member.id).as_str()));
        }
        let mut seen = HashSet::new();
        for copy_id in entity.copy_ids() {
            if !seen.insert(copy_id) {
                return Err(LibraryError::validation(format!("book copy {} listed twice", copy_id).as_str(), None));
            }
            match state.copies.iter().find(|c| c.id == copy_id) {
                None => {
                    return Err(LibraryError::not_found(format!("book copy {} not found", copy_id).as_str()));
                }
                Some(copy) if copy.status != CopyStatus::Available => {
                    return Err(LibraryError::conflict(
                        format!("book copy {} is {}", copy_id, copy.status).as_str(), Some("409".to_string())));
                }
                Some(_) => {}
            }
        }
        let mut loan = entity.clone();
        loan.id = new_id();
        loan.status = LoanStatus::Active;
        loan.return_date = None;
        for copy_id in entity.copy_ids() {
            state.set_copy_status(copy_id, CopyStatus::Borrowed);
        }
        state.embed_loan(&mut loan);
        state.loans.push(loan.clone());
        Ok(loan)
    }

    async fn update(&self, _ctx: &SessionContext, _entity: &LoanEntity) -> LibraryResult<LoanEntity> {
        Err(LibraryError::runtime("loan records cannot be updated", None))
    }

    async fn delete(&self, _ctx: &SessionContext, _id: &str) -> LibraryResult<()> {
        Err(LibraryError::runtime("loan records cannot be deleted", None))
    }
}

#[async_trait]
impl LoanRepository for MemoryCatalog {
    async fn change_status(&self, _ctx: &SessionContext, id: &str, status: LoanStatus) -> LibraryResult<LoanEntity> {
        let mut state = self.lock()?;
        let loan = state.loans.iter_mut().find(|l| l.id == id)
            .ok_or_else(|| LibraryError::not_found(format!("loan {} not found", id).as_str()))?;
        if loan.status == status {
            return Ok(loan.clone());
        }
        if !loan.status.can_transition_to(status) {
            return Err(LibraryError::conflict(
                format!("loan {} cannot go from {} to {}", loan.id, loan.status, status).as_str(), None));
        }
        let was_open = loan.status.is_open();
        loan.status = status;
        if status == LoanStatus::Returned && loan.return_date.is_none() {
            loan.return_date = Some(today());
        }
        let updated = loan.clone();
        if was_open && status == LoanStatus::Returned {
            for copy_id in updated.copy_ids() {
                state.set_copy_status(copy_id, CopyStatus::Available);
            }
        }
        Ok(updated)
    }
}

#[async_trait]
impl AuthRepository for MemoryCatalog {
    async fn login(&self, credentials: &Credentials) -> LibraryResult<LoginResponse> {
        let state = self.lock()?;
        let account = state.accounts.iter()
            .find(|a| a.profile.email.as_deref() == Some(credentials.email.trim())
                && a.password == credentials.password)
            .ok_or_else(|| LibraryError::auth("Identifiants invalides", Some("401".to_string())))?;
        let profile = account.profile.clone();
        Ok(LoginResponse {
            token: Some(new_id()),
            id: profile.id,
            email: profile.email,
            prenom: profile.prenom,
            nom: profile.nom,
            telephone: profile.telephone,
            biblio_name: profile.biblio_name,
            role: profile.role,
            message: None,
        })
    }

    async fn register(&self, registration: &RegistrationDto) -> LibraryResult<UserProfile> {
        let mut state = self.lock()?;
        if state.accounts.iter().any(|a| a.profile.email.as_deref() == Some(registration.email.as_str())) {
            return Err(LibraryError::conflict(
                format!("account {} already exists", registration.email).as_str(), Some("409".to_string())));
        }
        let mut profile = UserProfile::from(registration);
        profile.id = Some(new_id());
        profile.role = Some("LIBRARIAN".to_string());
        state.accounts.push(Account { profile: profile.clone(), password: registration.password.to_string() });
        Ok(profile)
    }

    async fn update_profile(&self, ctx: &SessionContext, profile: &UserProfile) -> LibraryResult<UserProfile> {
        let mut state = self.lock()?;
        let account = state.accounts.iter_mut()
            .find(|a| a.profile.id.as_deref() == Some(ctx.user_id()))
            .ok_or_else(|| LibraryError::not_found(format!("account {} not found", ctx.user_id()).as_str()))?;
        let mut updated = profile.clone();
        updated.id = account.profile.id.clone();
        updated.role = account.profile.role.clone();
        account.profile = updated.clone();
        Ok(updated)
    }

    async fn delete_account(&self, ctx: &SessionContext) -> LibraryResult<()> {
        let mut state = self.lock()?;
        let before = state.accounts.len();
        state.accounts.retain(|a| a.profile.id.as_deref() != Some(ctx.user_id()));
        if state.accounts.len() == before {
            return Err(LibraryError::not_found(format!("account {} not found", ctx.user_id()).as_str()));
        }
        Ok(())
    }
}
