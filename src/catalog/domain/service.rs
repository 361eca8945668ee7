use std::sync::Arc;
use async_trait::async_trait;
use crate::books::domain::model::BookEntity;
use crate::books::repository::BookRepository;
use crate::catalog::domain::CatalogService;
use crate::copies::domain::model::CopyEntity;
use crate::copies::repository::CopyRepository;
use crate::core::domain::{Configuration, ListingOptions};
use crate::core::library::{CopyStatus, LibraryError, LibraryResult, PaginatedResult};
use crate::core::listing::{apply, ListQuery, matches_search};
use crate::core::repository::find_by_id;
use crate::core::session::SessionContext;

pub struct CatalogServiceImpl {
    listing: ListingOptions,
    book_repository: Arc<dyn BookRepository>,
    copy_repository: Arc<dyn CopyRepository>,
}

impl CatalogServiceImpl {
    pub fn new(config: &Configuration, book_repository: Arc<dyn BookRepository>,
               copy_repository: Arc<dyn CopyRepository>) -> Self {
        Self {
            listing: config.listing.clone(),
            book_repository,
            copy_repository,
        }
    }
}

// BORROWED is owned by the loan lifecycle, the copy form may neither set nor clear it.
fn check_copy_edit(current: CopyStatus, next: CopyStatus) -> LibraryResult<()> {
    if next == CopyStatus::Borrowed && current != CopyStatus::Borrowed {
        return Err(LibraryError::validation(
            "a copy becomes BORROWED only through a loan", Some("status".to_string())));
    }
    if current == CopyStatus::Borrowed && next != CopyStatus::Borrowed {
        return Err(LibraryError::conflict(
            "a borrowed copy is released only by returning its loan", Some("BORROWED".to_string())));
    }
    Ok(())
}

#[async_trait]
impl CatalogService for CatalogServiceImpl {
    async fn list_books(&self, ctx: &SessionContext, query: &ListQuery) -> LibraryResult<PaginatedResult<BookEntity>> {
        ctx.ensure_active()?;
        let books = self.book_repository.list(ctx).await?;
        Ok(apply(&books, query, self.listing.books_page_size))
    }

    async fn categories(&self, ctx: &SessionContext) -> LibraryResult<Vec<String>> {
        ctx.ensure_active()?;
        let mut categories: Vec<String> = vec![];
        for book in self.book_repository.list(ctx).await? {
            if let Some(category) = book.category.map(|c| c.trim().to_string()).filter(|c| !c.is_empty()) {
                if !categories.contains(&category) {
                    categories.push(category);
                }
            }
        }
        Ok(categories)
    }

    async fn add_book(&self, ctx: &SessionContext, book: &BookEntity) -> LibraryResult<BookEntity> {
        book.validate()?;
        ctx.ensure_active()?;
        let created = self.book_repository.create(ctx, book).await?;
        tracing::info!("book {} added", created.id);
        Ok(created)
    }

    async fn update_book(&self, ctx: &SessionContext, book: &BookEntity) -> LibraryResult<BookEntity> {
        book.validate()?;
        ctx.ensure_active()?;
        self.book_repository.update(ctx, book).await
    }

    async fn remove_book(&self, ctx: &SessionContext, id: &str) -> LibraryResult<()> {
        ctx.ensure_active()?;
        self.book_repository.delete(ctx, id).await?;
        tracing::info!("book {} removed", id);
        Ok(())
    }

    async fn list_copies(&self, ctx: &SessionContext, query: &ListQuery) -> LibraryResult<PaginatedResult<CopyEntity>> {
        ctx.ensure_active()?;
        let copies = self.copy_repository.list(ctx).await?;
        Ok(apply(&copies, query, self.listing.copies_page_size))
    }

    async fn available_copies(&self, ctx: &SessionContext, search: Option<&str>) -> LibraryResult<Vec<CopyEntity>> {
        ctx.ensure_active()?;
        let term = search.map(|s| s.trim().to_lowercase()).filter(|s| !s.is_empty());
        Ok(self.copy_repository.list(ctx).await?
            .into_iter()
            .filter(|c| c.is_available() && matches_search(c, term.as_deref()))
            .collect())
    }

    async fn add_copy(&self, ctx: &SessionContext, copy: &CopyEntity) -> LibraryResult<CopyEntity> {
        copy.validate()?;
        if copy.status == CopyStatus::Borrowed {
            return Err(LibraryError::validation(
                "a new copy cannot be registered as BORROWED", Some("status".to_string())));
        }
        ctx.ensure_active()?;
        let created = self.copy_repository.create(ctx, copy).await?;
        tracing::info!("copy {} of book {} registered", created.id, created.book.id);
        Ok(created)
    }

    async fn update_copy(&self, ctx: &SessionContext, copy: &CopyEntity) -> LibraryResult<CopyEntity> {
        copy.validate()?;
        ctx.ensure_active()?;
        let copies = self.copy_repository.list(ctx).await?;
        let current = find_by_id(&copies, "book copy", copy.id.as_str())?;
        check_copy_edit(current.status, copy.status)?;
        self.copy_repository.update(ctx, copy).await
    }

    async fn remove_copy(&self, ctx: &SessionContext, id: &str) -> LibraryResult<()> {
        ctx.ensure_active()?;
        let copies = self.copy_repository.list(ctx).await?;
        let current = find_by_id(&copies, "book copy", id)?;
        if current.status == CopyStatus::Borrowed {
            return Err(LibraryError::conflict(
                format!("book copy {} is on loan", id).as_str(), Some("BORROWED".to_string())));
        }
        self.copy_repository.delete(ctx, id).await?;
        tracing::info!("copy {} removed", id);
        Ok(())
    }
}
