//! Integration tests driving the engine through whole matches.
//!
//! Time is advanced deterministically: the monotonic engine clock and the
//! manual wall clock move together one second at a time.

pub mod court_time_tests;
pub mod helpers;
pub mod interrupt_tests;
pub mod penalty_tests;
pub mod results_tests;
pub mod sequencing_tests;
