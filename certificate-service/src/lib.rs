//! Marathon completion certificate analyzer.
//!
//! Accepts an uploaded certificate (image or PDF, base64 in a JSON body),
//! extracts a structured race record with Gemini, stores it in MongoDB and
//! serves a per-athlete history listing.
pub mod config;
pub mod dtos;
pub mod handlers;
pub mod services;
pub mod startup;
