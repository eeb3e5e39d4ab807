pub mod invitations;
pub mod invite;
pub mod members;
