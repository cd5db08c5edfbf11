//! Utility modules for site-assets
//!
//! This module contains helper functions organized by functionality:
//! - `files`: Path expansion and directory management
//! - `images`: Image classification, sizing and resizing

pub mod files;
pub mod images;
