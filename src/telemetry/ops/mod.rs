pub mod run;
pub mod search;
pub mod channel;
pub mod queries;
