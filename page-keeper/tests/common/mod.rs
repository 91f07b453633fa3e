//! Shared fixtures: an in-memory store and a scripted authority.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use tokio::sync::Notify;

use page_keeper::credentials::{
    AuthorityError, AuthorityUnavailable, CredentialService, ExchangeResult, ExchangedIdentity,
    ExternalAuthority, LifetimeResult, ListResult, ManualClock, OwnedResource, Principal,
    PrincipalFields, RecordStore, Resource, ResourceFields, ServiceOptions,
};
use page_keeper::database::{SqlxRecordStore, init_pool_with_size, run_migrations};

pub const USER_PROOF: &str = "user-token";
pub const USER_EXTERNAL_ID: &str = "fb-user-1";
pub const DEFAULT_LIFETIME_SECS: u64 = 3600;

pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 4, 1, 9, 0, 0).unwrap()
}

pub fn page(resource_id: &str, name: &str) -> OwnedResource {
    OwnedResource {
        resource_id: resource_id.to_string(),
        display_name: name.to_string(),
        credential: format!("{resource_id}-token"),
    }
}

/// In-process authority with scriptable answers.
///
/// Only [`USER_PROOF`] is accepted, both as login proof and as principal
/// credential. With rotation enabled every list call hands out fresh page
/// tokens (`<base>#<generation>`), whose lifetime is `DEFAULT_LIFETIME_SECS + generation`.
#[derive(Default)]
pub struct FakeAuthority {
    listing: Mutex<Vec<OwnedResource>>,
    lifetimes: Mutex<HashMap<String, u64>>,
    failing_lifetimes: Mutex<HashMap<String, String>>,
    list_unavailable: AtomicBool,
    rotate: AtomicBool,
    generation: AtomicUsize,
    lifetime_delay: Mutex<Option<Duration>>,
    pub list_calls: AtomicUsize,
    pub lifetime_calls: AtomicUsize,
}

impl FakeAuthority {
    pub fn with_pages(pages: Vec<OwnedResource>) -> Self {
        let fake = Self::default();
        *fake.listing.lock().unwrap() = pages;
        fake
    }

    pub fn set_pages(&self, pages: Vec<OwnedResource>) {
        *self.listing.lock().unwrap() = pages;
    }

    pub fn set_lifetime(&self, credential: &str, secs: u64) {
        self.lifetimes
            .lock()
            .unwrap()
            .insert(credential.to_string(), secs);
    }

    pub fn fail_lifetime(&self, credential: &str) {
        self.fail_lifetime_with(credential, "token info failed");
    }

    /// The authority refuses to describe `credential`, as for a revoked token.
    pub fn revoke(&self, credential: &str) {
        self.fail_lifetime_with(credential, "token revoked");
    }

    fn fail_lifetime_with(&self, credential: &str, reason: &str) {
        self.failing_lifetimes
            .lock()
            .unwrap()
            .insert(credential.to_string(), reason.to_string());
    }

    pub fn set_list_unavailable(&self, unavailable: bool) {
        self.list_unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn enable_rotation(&self) {
        self.rotate.store(true, Ordering::SeqCst);
    }

    pub fn set_lifetime_delay(&self, delay: Duration) {
        *self.lifetime_delay.lock().unwrap() = Some(delay);
    }

    /// Lifetime the authority reports for a rotated token.
    pub fn rotated_lifetime(credential: &str) -> Option<u64> {
        let (_, generation) = credential.rsplit_once('#')?;
        generation
            .parse::<u64>()
            .ok()
            .map(|g| DEFAULT_LIFETIME_SECS + g)
    }
}

#[async_trait]
impl ExternalAuthority for FakeAuthority {
    async fn exchange_proof(&self, proof: &str) -> ExchangeResult {
        if proof != USER_PROOF {
            return Err(AuthorityError::InvalidProof("unknown proof".to_string()));
        }
        Ok(ExchangedIdentity {
            external_id: USER_EXTERNAL_ID.to_string(),
            display_name: "Ada Lovelace".to_string(),
            contact: Some("ada@example.com".to_string()),
            credential: proof.to_string(),
            lifetime_secs: 2 * DEFAULT_LIFETIME_SECS,
        })
    }

    async fn list_owned_resources(&self, principal_credential: &str) -> ListResult {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.list_unavailable.load(Ordering::SeqCst) {
            return Err(AuthorityUnavailable("listing timed out".to_string()));
        }
        if principal_credential != USER_PROOF {
            return Err(AuthorityUnavailable("token rejected".to_string()));
        }

        let mut pages = self.listing.lock().unwrap().clone();
        if self.rotate.load(Ordering::SeqCst) {
            let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            for page in &mut pages {
                page.credential = format!("{}#{}", page.credential, generation);
            }
        }
        Ok(pages)
    }

    async fn inspect_lifetime(&self, credential: &str) -> LifetimeResult {
        self.lifetime_calls.fetch_add(1, Ordering::SeqCst);
        let delay = *self.lifetime_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(reason) = self.failing_lifetimes.lock().unwrap().get(credential) {
            return Err(AuthorityUnavailable(reason.clone()));
        }
        if let Some(secs) = Self::rotated_lifetime(credential) {
            return Ok(secs);
        }
        Ok(self
            .lifetimes
            .lock()
            .unwrap()
            .get(credential)
            .copied()
            .unwrap_or(DEFAULT_LIFETIME_SECS))
    }
}

/// Record store that can park one `list_resources` call after it has read
/// its snapshot, until the test releases it.
pub struct PausingStore {
    inner: Arc<SqlxRecordStore>,
    pause_next_list: AtomicBool,
    pub listed: Notify,
    pub release: Notify,
}

impl PausingStore {
    pub fn pause_next_list(&self) {
        self.pause_next_list.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl RecordStore for PausingStore {
    async fn upsert_principal(
        &self,
        external_id: &str,
        fields: PrincipalFields,
    ) -> page_keeper::Result<Principal> {
        self.inner.upsert_principal(external_id, fields).await
    }

    async fn upsert_resource(
        &self,
        resource_id: &str,
        fields: ResourceFields,
    ) -> page_keeper::Result<Resource> {
        self.inner.upsert_resource(resource_id, fields).await
    }

    async fn find_principal(&self, id: &str) -> page_keeper::Result<Option<Principal>> {
        self.inner.find_principal(id).await
    }

    async fn find_resource(&self, resource_id: &str) -> page_keeper::Result<Option<Resource>> {
        self.inner.find_resource(resource_id).await
    }

    async fn list_resources(&self) -> page_keeper::Result<Vec<Resource>> {
        let snapshot = self.inner.list_resources().await?;
        if self.pause_next_list.swap(false, Ordering::SeqCst) {
            self.listed.notify_one();
            self.release.notified().await;
        }
        Ok(snapshot)
    }

    async fn delete_resource(&self, resource_id: &str) -> page_keeper::Result<bool> {
        self.inner.delete_resource(resource_id).await
    }

    async fn update_resource_active(
        &self,
        resource_id: &str,
        expected_expiry: DateTime<Utc>,
        active: bool,
        observed_at: DateTime<Utc>,
    ) -> page_keeper::Result<bool> {
        self.inner
            .update_resource_active(resource_id, expected_expiry, active, observed_at)
            .await
    }
}

pub struct Harness {
    pub service: Arc<CredentialService>,
    pub store: Arc<SqlxRecordStore>,
    pub authority: Arc<FakeAuthority>,
    pub clock: Arc<ManualClock>,
}

async fn sqlite_store() -> Arc<SqlxRecordStore> {
    let pool = init_pool_with_size("sqlite::memory:", 1).await.unwrap();
    run_migrations(&pool).await.unwrap();
    Arc::new(SqlxRecordStore::new(pool))
}

fn build_harness(
    service_store: Arc<dyn RecordStore>,
    store: Arc<SqlxRecordStore>,
    authority: FakeAuthority,
) -> Harness {
    let authority = Arc::new(authority);
    let clock = Arc::new(ManualClock::new(t0()));

    let service = Arc::new(CredentialService::new(
        service_store,
        authority.clone() as Arc<dyn ExternalAuthority>,
        clock.clone(),
        ServiceOptions::default(),
    ));

    Harness {
        service,
        store,
        authority,
        clock,
    }
}

pub async fn harness(authority: FakeAuthority) -> Harness {
    let store = sqlite_store().await;
    build_harness(store.clone(), store, authority)
}

/// Like [`harness`], with the service reading and writing through a [`PausingStore`].
pub async fn pausing_harness(authority: FakeAuthority) -> (Harness, Arc<PausingStore>) {
    let store = sqlite_store().await;
    let pausing = Arc::new(PausingStore {
        inner: store.clone(),
        pause_next_list: AtomicBool::new(false),
        listed: Notify::new(),
        release: Notify::new(),
    });
    let h = build_harness(pausing.clone(), store, authority);
    (h, pausing)
}
