//! Social Panel Module
//!
//! Host-side actions of the demo: casts, profiles, mini-app management,
//! haptics, swaps, quick-auth sign-in and test notifications.
//!
//! # Components
//! - **SocialPanel**: host actions plus the session folded from host events
//! - **BackendClient**: calls this app's own HTTP backend
//! - **QuickAuthPanel**: sign-in with a quick-auth token
//! - **SwapsPanel**: token swap and send sheets

mod actions;
mod auth;
mod backend;
mod swaps;


pub use actions::{
    CAST_EMBED, CAST_TEXT, CHANNEL_OPTIONS, COMPOSE_URL, DEFAULT_MANIFEST_DOMAIN, HAPTIC_CAPABILITIES, MINI_APP_URLS,
    RICKROLL_URL, SocialPanel,
};
pub use auth::{DecodedToken, QuickAuthPanel, decode_token};
pub use backend::BackendClient;
pub use swaps::{SwapsPanel, degen_send, usdc_to_degen_swap};
