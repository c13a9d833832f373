//! LogoLens: hover a company logo on a web page, get the company behind it.
//!
//! The crate holds the lookup pipeline (candidate filtering, image encoding,
//! Cloud Vision logo detection, Brandfetch enrichment, caching, supersession)
//! and the hover interaction state machine. The host page supplies images,
//! a tooltip renderer and a credentials provider through the [`ports`].
#![forbid(unsafe_code)]

pub mod adapters;
pub mod app;
pub mod domain;
pub mod infrastructure;
pub mod ports;

pub use app::{AppController, InteractionController, LookupOrchestrator};
pub use domain::{CandidateImage, CompanyInfo, Credentials, DomainError, TooltipPayload};
pub use ports::{Anchor, CredentialsProvider, TooltipRenderer};
