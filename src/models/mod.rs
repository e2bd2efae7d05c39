pub mod outcome;

pub use outcome::{Mindset, Outcome};
