pub mod bugs;
pub mod database_service;
pub mod groups;
pub mod invitations;
pub mod payments;
pub mod sessions;
pub mod subscriptions;
pub mod users;
