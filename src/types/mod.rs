pub mod bug;
pub mod error;
pub mod group;
pub mod invitation;
pub mod payment;
pub mod response;
pub mod subscription;
pub mod user;
