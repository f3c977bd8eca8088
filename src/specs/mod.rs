// src/specs/mod.rs
//! # Page-specific scraping
//!
//! Each spec knows *where the ground truth lives in one page's HTML* and how
//! to pull it out. Right now there is one page: the 6502 instruction
//! reference, whose per-instruction tables carry the cycle counts.
//!
//! ## What lives here
//! - **Pure HTML extraction** with `core::html` helpers (case-insensitive tag
//!   blocks, tag stripping, entity/whitespace normalization).
//! - **Row selection** (which rows are data, which are headers/navigation).
//! - **Light shaping** into a `timing::TimingTable`.
//!
//! ## What does **not** live here
//! - Reading or writing the catalog (`catalog`).
//! - Merging timings into records (`merge`).
//!
//! ## Typical call chain
//! ```text
//! runner::run → specs::reference::fetch → core::net::http_get
//!                                      ↘ specs::reference::parse → TimingTable
//! ```
//!
//! ## Testing notes
//! `parse` is offline; feed it captured HTML.
pub mod reference;
