//! # choreshare-render
//!
//! Rendering backends for choreshare plans.
//!
//! This crate provides:
//! - Excel chore charts (the workbook handed to the household)
//! - Text output for previews
//!
//! ## Example
//!
//! ```rust,ignore
//! use choreshare_core::Renderer;
//! use choreshare_render::{ExcelRenderer, TextRenderer};
//!
//! let xlsx = ExcelRenderer::new().sheet_name("Details").render(&plan)?;
//! std::fs::write("out.xlsx", xlsx)?;
//!
//! println!("{}", TextRenderer::new().skip_empty_weeks().render(&plan)?);
//! ```

pub mod excel;
pub mod text;

pub use excel::ExcelRenderer;
pub use text::TextRenderer;
