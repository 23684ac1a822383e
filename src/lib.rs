//! cosmic-crm: a terminal contact manager with numerology, lunar phases and
//! model-written personality reports, built with Hexagonal Architecture.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod shared;
pub mod usecases;
