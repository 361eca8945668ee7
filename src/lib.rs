//! Back-office client for a library catalog.
//!
//! The library talks to the Catalog Store over REST (or to an in-memory stand-in), keeps the
//! loan lifecycle and copy availability consistent, and exposes the admin screens as an axum
//! router through [`app`].

pub mod auth;
pub mod books;
pub mod catalog;
pub mod copies;
pub mod core;
pub mod gateway;
pub mod loans;
pub mod members;
pub mod utils;

use axum::{
    routing::{get, post, put},
    Router,
};
use crate::core::controller::AppState;

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/auth/login", post(auth::controller::login))
        .route("/auth/register", post(auth::controller::register))
        .route("/auth/profile", put(auth::controller::update_profile))
        .route("/auth/account", axum::routing::delete(auth::controller::delete_account))
        .route("/dashboard", get(loans::controller::dashboard))
        .route("/books",
               get(catalog::controller::list_books).post(catalog::controller::add_book))
        .route("/books/categories", get(catalog::controller::book_categories))
        .route("/books/:id",
               put(catalog::controller::update_book).delete(catalog::controller::remove_book))
        .route("/copies",
               get(catalog::controller::list_copies).post(catalog::controller::add_copy))
        .route("/copies/available", get(catalog::controller::available_copies))
        .route("/copies/:id",
               put(catalog::controller::update_copy).delete(catalog::controller::remove_copy))
        .route("/members",
               get(members::controller::list_members).post(members::controller::add_member))
        .route("/members/:id",
               put(members::controller::update_member).delete(members::controller::remove_member))
        .route("/members/:id/loans", get(loans::controller::member_history))
        .route("/loans",
               get(loans::controller::list_loans).post(loans::controller::create_loan))
        .route("/loans/by-member", get(loans::controller::member_loans))
        .route("/loans/audit", get(loans::controller::audit_loans))
        .route("/loans/:id/return", put(loans::controller::return_loan))
        .with_state(state)
}
