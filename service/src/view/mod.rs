//! View-state definitions.

mod controller;

pub use self::controller::{Controller, State};
