pub mod command;
pub mod controller;
pub mod domain;
pub mod library;
pub mod listing;
pub mod loader;
pub mod repository;
pub mod session;
