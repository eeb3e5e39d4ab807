pub mod admin;
pub mod create;
pub mod delete;
pub mod detail;
pub mod leave;
pub mod list;
