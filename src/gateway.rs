pub mod factory;
pub mod memory;
pub mod rest;
