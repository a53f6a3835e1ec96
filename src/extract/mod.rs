pub mod counts;
pub mod email;
pub mod links;
pub mod profile;
