pub mod layout;
pub mod session;
