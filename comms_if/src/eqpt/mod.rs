//! # Equipment Interface
//!
//! This module defines the interface structures which are exchanged with the equipment drivers.

pub mod drive;
