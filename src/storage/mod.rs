pub mod catalog;
pub mod layout;
pub mod probe;
pub mod wire;
