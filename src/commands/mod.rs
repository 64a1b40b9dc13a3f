// ABOUTME: Command module aggregator for the v3push CLI.
// ABOUTME: Re-exports push, logs, and init command handlers.

mod init;
mod logs;
mod push;

pub use init::init;
pub use logs::logs;
pub use push::push;
