//! External command execution and executable lookup.

pub mod command;
pub mod path;

pub use command::{
    display_command, execute_shell_streaming, execute_streaming, CommandOptions, CommandResult,
    OutputLine,
};
pub use path::{find_executable, is_executable, prepend_to_path, system_search_path};
