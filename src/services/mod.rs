pub mod fs_service;
pub mod report;
pub mod trainer;
pub mod training_client;
