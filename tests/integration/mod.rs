/// Integration test harness
///
/// Exercises storage-backed tool flows end to end.

mod tracker_integration;
