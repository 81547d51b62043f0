pub mod answer;
pub mod choices;

pub use answer::*;
pub use choices::{parse_choices, parse_choices_str};
