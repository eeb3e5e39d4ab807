pub mod gateway;
pub mod media;
pub mod token;
pub mod webutils;
