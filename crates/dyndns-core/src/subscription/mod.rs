//! Registrar subscription
//!
//! Subscribing is a one-time handshake:
//!
//! ```text
//! Unsubscribed ──available──▶ KeyObtained ──registered──▶ Subscribed
//!      ▲                           │                          │
//!      └──────── any failure ──────┘                    install schedule
//! ```
//!
//! Nothing is persisted until the registrar accepts the key, apart from the
//! key pair itself which is reusable for a later attempt. A schedule
//! installation failure after acceptance is reported as such; the
//! registration stands.

use tracing::{debug, info, warn};

use crate::domain::Domain;
use crate::error::{Error, Result};
use crate::traits::{Availability, KeyMaterial, KeyStore, Registrar, Registration, Scheduler};

/// Progress of a subscription attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionState {
    /// Nothing registered
    Unsubscribed,
    /// Domain available and key in hand
    KeyObtained,
    /// Registrar accepted the key
    Subscribed,
}

/// Result of a successful subscription
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionOutcome {
    /// Subscribed domain
    pub domain: Domain,
    /// Key material from the key store, `None` if the caller supplied the key
    pub key: Option<KeyMaterial>,
    /// Final state (always [`SubscriptionState::Subscribed`])
    pub state: SubscriptionState,
}

/// Performs the registrar handshake
pub struct SubscriptionClient {
    /// Registrar API
    registrar: Box<dyn Registrar>,

    /// Key generation/lookup
    key_store: Box<dyn KeyStore>,

    /// Periodic update installer
    scheduler: Box<dyn Scheduler>,
}

impl SubscriptionClient {
    /// Create a new subscription client
    pub fn new(
        registrar: Box<dyn Registrar>,
        key_store: Box<dyn KeyStore>,
        scheduler: Box<dyn Scheduler>,
    ) -> Self {
        Self {
            registrar,
            key_store,
            scheduler,
        }
    }

    /// Subscribe `domain`, registering `public_key` or the key store's key
    ///
    /// # Returns
    ///
    /// - `Ok(SubscriptionOutcome)`: Registered and schedule installed
    /// - `Err(Error::DomainUnavailable)`: Availability check failed; no key was
    ///   generated and nothing was posted
    /// - `Err(Error::KeyGeneration)`: No key could be produced
    /// - `Err(Error::RegistrationRejected)`: Registrar refused the key
    /// - `Err(Error::ScheduleInstall)`: Registered, but the periodic update
    ///   could not be installed
    pub async fn subscribe(
        &self,
        domain: &Domain,
        public_key: Option<&str>,
    ) -> Result<SubscriptionOutcome> {
        let mut state = SubscriptionState::Unsubscribed;

        match self.registrar.check_availability(domain).await? {
            Availability::Available => {
                debug!("{} is available on {}", domain, self.registrar.host());
            }
            Availability::Unavailable { status } => {
                warn!("{} is not available on {} (status {})", domain, self.registrar.host(), status);
                return Err(Error::domain_unavailable(domain.as_str(), status));
            }
        }

        let (key, public_key) = match public_key {
            Some(public_key) => (None, public_key.to_string()),
            None => {
                if !self.key_store.exists(domain).await? {
                    info!("DNS key for {} is being generated, it may take a while...", domain);
                }
                let key = self.key_store.get_or_create(domain).await?;
                let public_key = key.public_key.clone();
                (Some(key), public_key)
            }
        };
        state = transition(state, SubscriptionState::KeyObtained);

        match self.registrar.register_key(domain, &public_key).await? {
            Registration::Accepted => {
                state = transition(state, SubscriptionState::Subscribed);
                info!("{} registered on {}", domain, self.registrar.host());
            }
            Registration::Rejected { message } => {
                warn!("Registrar rejected {}: {}", domain, message);
                return Err(Error::registration_rejected(domain.as_str(), message));
            }
        }

        self.scheduler.install().await?;

        Ok(SubscriptionOutcome {
            domain: domain.clone(),
            key,
            state,
        })
    }
}

fn transition(from: SubscriptionState, to: SubscriptionState) -> SubscriptionState {
    debug!("Subscription state {:?} -> {:?}", from, to);
    to
}
