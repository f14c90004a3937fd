//! UI components.

pub mod mosaic;
