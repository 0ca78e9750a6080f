//! Event types and observers used by the engine.
//!
//! Events provide a decoupled way for the physics core to talk to the rest
//! of the game without direct dependencies.
//!
//! Submodules:
//! - [`input`] – jump requests from the input layer and the latch observer
//! - [`physics`] – death, grounded and after-step notifications
pub mod input;
pub mod physics;
