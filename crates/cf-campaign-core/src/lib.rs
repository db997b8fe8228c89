//! Campaign browsing and funding, independent of the DOM.
//!
//! [`CampaignController`] owns the wallet session and view state for the live
//! contract front-end; [`DemoEngine`] is the fully local stand-in used when no
//! chain is available. Both produce an [`AppView`] for the shell to paint.

pub mod controller;
pub mod demo;
pub mod gating;
pub mod state;
pub mod view;

pub use controller::{ActionError, CampaignController, SessionAction, WriteKind};
pub use demo::{DemoEngine, DemoError};
pub use state::{CampaignDetail, CampaignRow, ListState, ViewState};
pub use view::{AppView, CampaignCard, DetailView, ListView, TierRow};
