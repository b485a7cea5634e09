//! Shared Kernel - Domain-crossing minimal core
//!
//! The vocabulary every backend crate agrees on:
//! - The unified HTTP-facing error type and its classification
//! - Typed identifiers
//!
//! Only things whose meaning is identical in every service belong here.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
pub mod id;
