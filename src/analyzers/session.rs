//! The one owner of "current results".
//!
//! Display, export and projection all read from a [`Session`]; only
//! [`Session::reload`] replaces its results, and only one reload can run at a
//! time so a half-written snapshot is never observed.

use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tracing::{info, warn};

use crate::analyzers::aggregate::overall_metrics;
use crate::analyzers::analyzer::scrape_and_store;
use crate::analyzers::projection::Projection;
use crate::analyzers::types::{OverallMetrics, SemesterResults, Snapshot};
use crate::config::Settings;
use crate::error::{CgpaError, Result};
use crate::infra::store::{self, SnapshotStore};
use crate::obfuscate::Obfuscator;
use crate::services::results_source::RowSource;

pub struct Session {
    store: Arc<dyn SnapshotStore>,
    obfuscator: Obfuscator,
    settings: RwLock<Settings>,
    current: RwLock<Option<Snapshot>>,
    reload_gate: Mutex<()>,
}

impl Session {
    pub fn new(store: Arc<dyn SnapshotStore>, obfuscator: Obfuscator, settings: Settings) -> Self {
        Self {
            store,
            obfuscator,
            settings: RwLock::new(settings),
            current: RwLock::new(None),
            reload_gate: Mutex::new(()),
        }
    }

    /// Opens a session on `store`, reading persisted settings and the last snapshot.
    pub async fn open(store: Arc<dyn SnapshotStore>, obfuscator: Obfuscator) -> Result<Self> {
        let settings = store::load_settings(store.as_ref()).await?;
        let session = Self::new(store, obfuscator, settings);
        session.load_initial().await?;
        Ok(session)
    }

    /// Replaces the in-memory results with the stored snapshot, if any.
    pub async fn load_initial(&self) -> Result<Option<Snapshot>> {
        let loaded = store::load_snapshot(self.store.as_ref(), &self.obfuscator).await?;
        if loaded.is_none() {
            warn!("No stored results; reload from the results page");
        }
        *self.current.write().await = loaded.clone();
        Ok(loaded)
    }

    /// Scrapes `source`, persists the new snapshot and makes it current.
    ///
    /// Fails with [`CgpaError::ReloadInProgress`] if another reload has not
    /// finished yet. On any other failure the previous results stay current.
    pub async fn reload(&self, source: &dyn RowSource) -> Result<Snapshot> {
        let _gate = self
            .reload_gate
            .try_lock()
            .map_err(|_| CgpaError::ReloadInProgress)?;

        let obfuscate = self.settings.read().await.obfuscate;
        let obfuscator = obfuscate.then_some(&self.obfuscator);

        let snapshot = scrape_and_store(source, self.store.as_ref(), obfuscator).await?;
        *self.current.write().await = Some(snapshot.clone());
        Ok(snapshot)
    }

    pub async fn snapshot(&self) -> Option<Snapshot> {
        self.current.read().await.clone()
    }

    pub async fn results(&self) -> Result<SemesterResults> {
        self.current
            .read()
            .await
            .as_ref()
            .map(|s| s.terms.clone())
            .ok_or(CgpaError::NoData)
    }

    pub async fn metrics(&self) -> Result<OverallMetrics> {
        let current = self.current.read().await;
        let snapshot = current.as_ref().ok_or(CgpaError::NoData)?;
        Ok(overall_metrics(&snapshot.terms))
    }

    pub async fn project(&self, target_cgpa: f64, remaining_credits: f64) -> Result<Projection> {
        let metrics = self.metrics().await?;
        Projection::from_metrics(&metrics, target_cgpa, remaining_credits)
    }

    pub async fn settings(&self) -> Settings {
        self.settings.read().await.clone()
    }

    /// Persists new settings. When the obfuscation choice changes, the
    /// current snapshot is written again in the new form first; settings are
    /// only saved once that succeeded.
    pub async fn update_settings(&self, new: Settings) -> Result<()> {
        let _gate = self
            .reload_gate
            .try_lock()
            .map_err(|_| CgpaError::ReloadInProgress)?;

        let previous = self.settings.read().await.clone();
        let current = self.current.read().await.clone();
        let resave = previous.obfuscate != new.obfuscate;

        if resave {
            if let Some(snapshot) = &current {
                let obfuscator = new.obfuscate.then_some(&self.obfuscator);
                store::save_snapshot(self.store.as_ref(), snapshot, obfuscator).await?;
                info!(obfuscate = new.obfuscate, "Re-saved snapshot with new settings");
            }
        }

        if let Err(e) = store::save_settings(self.store.as_ref(), &new).await {
            if let (true, Some(snapshot)) = (resave, &current) {
                let obfuscator = previous.obfuscate.then_some(&self.obfuscator);
                if let Err(restore) =
                    store::save_snapshot(self.store.as_ref(), snapshot, obfuscator).await
                {
                    warn!(error = %restore, "Could not restore snapshot after failed settings write");
                }
            }
            return Err(e);
        }

        *self.settings.write().await = new;
        Ok(())
    }
}
