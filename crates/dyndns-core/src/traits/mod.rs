//! Core traits for the dynamic DNS system
//!
//! This module defines the seams between the update/subscription logic and
//! the outside world.
//!
//! - [`IpResolver`]: Determine the current public IP
//! - [`IpCache`]: Remember the last IP committed to DNS
//! - [`KeyStore`]: Own the TSIG key material for a domain
//! - [`UpdateExecutor`]: Submit a zone update transaction
//! - [`Registrar`]: Talk to the dynamic DNS registrar
//! - [`Scheduler`]: Install/remove the periodic update entry
//! - [`CommandRunner`]: Run external tools with captured output

pub mod command;
pub mod ip_cache;
pub mod ip_resolver;
pub mod key_store;
pub mod registrar;
pub mod scheduler;
pub mod update_executor;

pub use command::{CommandOutput, CommandRunner};
pub use ip_cache::IpCache;
pub use ip_resolver::IpResolver;
pub use key_store::{KeyMaterial, KeyStore};
pub use registrar::{Availability, Registrar, Registration};
pub use scheduler::Scheduler;
pub use update_executor::UpdateExecutor;
