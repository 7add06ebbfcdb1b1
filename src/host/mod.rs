//! Host Bridge Module
//!
//! The mini-app talks to its host client (the social app it is embedded in)
//! through an explicitly constructed [`MiniAppHost`]. Components receive the
//! host by reference; event listeners live exactly as long as the
//! [`EventSubscription`] that owns them.
//!
//! # Components
//! - **HostTransport**: the message channel to the host (one async `call`)
//! - **MiniAppHost**: typed actions, context and event dispatch
//! - **HostSession**: folds host events into the "added / notifications" view

mod events;
mod sdk;
mod transport;
mod types;

#[cfg(test)]
pub(crate) mod testing;


pub use events::{EventSubscription, HostEvent, HostSession};
pub use sdk::MiniAppHost;
pub use transport::{HostError, HostErrorKind, HostTransport};
pub use types::{
    AddMiniAppResult, CastRef, ClientContext, ComposeCastOptions, ComposeCastResult, ImpactStyle,
    MiniAppContext, NotificationDetails, NotificationType, SafeAreaInsets, SendTokenOptions,
    SolanaSimulation, SwapTokenOptions, UserContext,
};
