mod generate_answer;

pub use generate_answer::*;
