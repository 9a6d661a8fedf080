//! Typed client and page state for the content-production dashboard:
//! release calendar, deliverables table and publishing queue.

pub mod api;
pub mod calendar;
pub mod config;
pub mod filter;
pub mod model;
pub mod mutation;
pub mod pages;
pub mod render;
