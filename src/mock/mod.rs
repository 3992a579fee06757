mod display;
mod script;
mod terminal;

pub use display::{DisplayError, TerminalDisplay};
pub use script::{ScriptError, ScriptedPlayer};
pub use terminal::run_interactive_terminal;
