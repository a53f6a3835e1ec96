pub mod config;
pub mod ctx;
pub mod ops;

use ctx::LogCtx;

// One typed context per command
pub fn run() -> LogCtx<ops::run::Run> { LogCtx::new(config::logs_are_json()) }
pub fn search() -> LogCtx<ops::search::Search> { LogCtx::new(config::logs_are_json()) }
pub fn channel() -> LogCtx<ops::channel::Channel> { LogCtx::new(config::logs_are_json()) }
pub fn queries() -> LogCtx<ops::queries::Queries> { LogCtx::new(config::logs_are_json()) }
