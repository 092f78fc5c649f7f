pub mod matching;
pub mod messaging;
pub mod profiles;
pub mod recommendations;

pub use matching::MatchSubject;
