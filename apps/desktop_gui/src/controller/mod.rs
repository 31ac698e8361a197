//! Controller layer: UI events mapped onto session transitions, and command orchestration.

pub mod events;
pub mod orchestration;
