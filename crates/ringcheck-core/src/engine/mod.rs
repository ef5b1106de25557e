pub mod runner;
pub mod session;

pub use runner::Runner;
pub use session::{PollOutcome, SessionController, SessionState};
