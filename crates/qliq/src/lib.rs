//! # QLIQ
//!
//! Client core for the QLIQ MLM shop.
//!
//! The crate is a thin layer over the shop's REST API. All pricing, stock,
//! commission and tree-building logic lives on the server; what lives here
//! is the boundary code that screens would otherwise duplicate.
//!
//! ## Architecture
//!
//! - **Session**: the bearer credential, kept in a [`CredentialStore`] and
//!   read on every request
//! - **API client**: one async method per remote capability, returning
//!   typed payloads or a typed [`ApiError`]
//! - **Normalizer**: turns the server's downline JSON into [`ReferralNode`]s,
//!   rejecting nodes without an id and trees nested past a ceiling
//! - **Renderer**: flattens a tree into indented, colour-coded
//!   [`RenderedRow`]s in pre-order, refusing cycles
//!
//! ```text
//! caller → ApiClient → REST API → JSON → normalize → render → rows
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod client;
pub mod config;
pub mod context;
pub mod error;
pub mod render;
pub mod session;
pub mod tree;

// Re-export main types
pub use client::{
    ApiClient, CartItem, CartState, LoginResponse, Order, OrderConfirmation, OrderItem, Product,
    RegisterRequest, UserProfile,
};
pub use config::ClientConfig;
pub use context::TreeContext;
pub use error::{ApiError, ConfigError, Result, StoreError, TreeError};
pub use render::{render, render_with, LevelColors, RenderedRow, TreeView};
pub use session::{CredentialStore, FileCredentialStore, MemoryCredentialStore, Session};
pub use tree::{normalize, FieldNames, ReferralNode};

/// QLIQ version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
