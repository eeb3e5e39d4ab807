pub mod checkout;
pub mod payments;
pub mod status;
