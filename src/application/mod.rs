/// Application layer: orchestration services and the operation lifecycle
pub mod services;
pub mod use_cases;
