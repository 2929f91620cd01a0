// Integration tests exercising the allocator, the detection rules, and
// the service layer end to end with in-memory collaborators.

mod allocator_tests;
mod service_tests;
