//! Ports: trait contracts between the core and its collaborators.

pub mod outbound;
