//! pdfmarks-parse: PDF document service for pdfmarks.
//!
//! This crate reads a PDF's `/Outlines` tree into a
//! [`pdfmarks_core::Outline`] and writes one back, through the
//! [`OutlineBackend`] trait. [`LopdfBackend`] implements it with lopdf.

pub mod backend;
pub mod error;
pub mod lopdf_backend;

pub use backend::OutlineBackend;
pub use error::BackendError;
pub use lopdf_backend::{LopdfBackend, LopdfDocument};
pub use pdfmarks_core;
