pub mod alpha_vantage;
pub mod extract;
pub mod fetch;
pub mod provider;
