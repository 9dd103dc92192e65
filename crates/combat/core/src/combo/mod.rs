//! Combo input history and attack selection.

mod input;
mod selector;
mod state;

pub use input::{InputHistory, InputToken};
pub use selector::{
    Selection, auto_reload, current_phase, finish_reload, select_attack, start_reload,
};
pub use state::{AttackPhase, ComboState};
