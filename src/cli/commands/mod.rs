//! One module per subcommand.

pub mod audit_cmd;
pub mod compare;
pub mod completions;
pub mod delete;
pub mod get;
pub mod list;
pub mod rotate;
pub mod store;
pub mod verify;
