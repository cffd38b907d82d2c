//! # Unit Components
//!
//! Groups the unit tests by crate module: shared types, the instruction set,
//! the lifter and the front-end layers built on top of them.






/// Image loading tests for raw and ELF inputs.
pub mod loader;
