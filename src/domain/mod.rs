/// Domain layer: value objects and entities of the sync/revert orchestration
pub mod entities;
pub mod value_objects;
