pub mod driver;
pub mod playwright;
pub mod session;
