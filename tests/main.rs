/*!
 * Main test entry point for registrar test suite
 */

// Import common test utilities
pub mod common;

// Import unit tests
mod unit {
    // App configuration tests
    pub mod config_tests;

    // Store facade and connection tests
    pub mod store_tests;
}

// Import integration tests
mod integration {
    // Cross-repository cascading delete tests
    pub mod cascade_tests;

    // Sample data seeding tests
    pub mod seeding_tests;
}
