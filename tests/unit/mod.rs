/// Unit test harness
///
/// Exercises the domain layer through the public crate interface.

mod streak_tests;
mod domain_tests;
