// # dyndns-core
//
// Core library for the dynamic DNS subscription and update system.
//
// ## Architecture Overview
//
// This library provides the core functionality for keeping a host's DNS
// records in sync with its public IP:
// - **IpResolver**: Trait for determining the current public IP
// - **IpCache**: Trait for remembering the last applied IP (change detection)
// - **KeyStore**: Trait for the TSIG key material of a domain
// - **ZoneBuilder**: Pure construction of the delete-then-add transaction
// - **UpdateExecutor**: Trait for submitting a transaction
// - **UpdateEngine**: Orchestrates one resolve → compare → build → apply cycle
// - **SubscriptionClient**: One-time registrar handshake
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Core logic is separate from tool/HTTP integrations
// 2. **Explicit Outcomes**: Operations return outcome types, callers render them
// 3. **Idempotency**: Every update rebuilds the full record set from scratch
// 4. **No Hidden Retries**: Failures surface; the next scheduled cycle retries
// 5. **Library-First**: All core functionality can be used as a library

pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod ip;
pub mod process;
pub mod schedule;
pub mod state;
pub mod subscription;
pub mod traits;
pub mod zone;

// Re-export core types for convenience
pub use config::DyndnsConfig;
pub use domain::Domain;
pub use engine::{UpdateEngine, UpdateOutcome, UpdateRequest};
pub use error::{Error, Result};
pub use ip::IpAddress;
pub use process::TokioCommandRunner;
pub use schedule::CronFileScheduler;
pub use state::{FileIpCache, MemoryIpCache};
pub use subscription::{SubscriptionClient, SubscriptionOutcome, SubscriptionState};
pub use traits::{IpCache, IpResolver, KeyStore, Registrar, Scheduler, UpdateExecutor};
pub use zone::{ZoneBuilder, ZoneUpdateTransaction};
