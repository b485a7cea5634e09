//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (OS randomness, SHA-256, Base64, constant-time compare)
//! - Password hashing (Argon2id with a self-describing encoded format)
//! - Cookie management
//! - Client address resolution

pub mod client;
pub mod cookie;
pub mod crypto;
pub mod password;
