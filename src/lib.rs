//! Cenacolo Vinciano date fetcher.
//!
//! Drives a headless Chromium session against the VivaTicket event page,
//! probes the DOM with a list of candidate selectors and collects whatever
//! looks date-like into [`models::FetchResult`]. The selector lists live in
//! the [`scrapers::VivaTicket`] site adapter; the browser engine sits behind
//! the [`browser::Page`] trait so the pipeline can be exercised without a
//! real browser.

pub mod browser;
pub mod config;
pub mod fetcher;
pub mod models;
pub mod output;
pub mod parsers;
pub mod scrapers;
