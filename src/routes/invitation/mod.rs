pub mod list;
pub mod respond;
