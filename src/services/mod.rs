/// OpenAPI documentation generation.
pub mod documentation;
/// Draft lifecycle and pick orchestration.
pub mod draft_service;
/// Health check service.
pub mod health_service;
/// Custom pool management and search.
pub mod pool_service;
/// Team queue management.
pub mod queue_service;
/// Poll snapshots and lazy clock-expiry handling.
pub mod snapshot_service;
