pub mod performance_types;
pub mod training_types;
