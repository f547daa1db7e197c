//! Ember engine crate.
//!
//! Platform + GPU runtime for the mesh samples: device bootstrap, a single
//! window loop, shader validation and a one-pipeline mesh renderer.
//!
//! Mesh data itself lives in `ember-mesh` and is re-exported as [`mesh`].

pub mod core;
pub mod device;
pub mod logging;
pub mod render;
pub mod time;
pub mod window;

pub use ember_mesh as mesh;
