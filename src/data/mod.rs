pub mod memory;
pub mod mysql;
pub mod user_repository;
