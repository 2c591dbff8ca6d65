//! Coursemap Core Types
//!
//! This crate provides the foundational types shared by the Coursemap layout
//! engine and its front ends:
//!
//! - **Geometry**: Points, sizes, bounds and insets ([`geometry`] module)
//! - **Colors**: CSS color handling ([`color::Color`])
//! - **Catalog**: Course, module and lesson records ([`catalog`] module)

pub mod catalog;
pub mod color;
pub mod geometry;
