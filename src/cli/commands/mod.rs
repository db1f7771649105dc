//! One module per subcommand.

pub mod add;
pub mod audit_cmd;
pub mod completions;
pub mod delete;
pub mod get;
pub mod init;
pub mod list;
pub mod lock;
pub mod passwd;
pub mod search;
pub mod shell;
pub mod update;
