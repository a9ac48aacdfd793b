//! Common utilities shared by the reconstruction modules.
//!
//! Transverse-plane geometry helpers and text dumps used by trace logging.

pub mod display;
pub mod geometry;
