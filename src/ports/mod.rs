//! Ports (trait boundaries) for external dependencies.
//!
//! This module defines the interfaces between the training loop and the code
//! that watches it. Following hexagonal architecture, these traits are owned
//! by the domain and implemented by adapters such as the observers in
//! [`crate::pipeline::observers`].

pub mod observer;

pub use observer::Observer;
