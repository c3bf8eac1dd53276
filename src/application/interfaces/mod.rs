pub mod checkout;
pub mod clock;
