pub mod simulated_checkout;
