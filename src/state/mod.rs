// src/state/mod.rs
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use crate::analysis::{run_analysis_with_cancel, RunResults};
use crate::config::{Alternative, PriceIndex, Scenario, Treatment};
use crate::error::{LccaError, LccaResult};

/// Owns the editable inputs and the latest results for one user.
///
/// Only one run may be active at a time. A run works on a snapshot of the
/// scenario, and its results replace the previous ones only once both
/// analyzers have finished.
#[derive(Debug)]
pub struct AnalysisSession {
    scenario: RwLock<Scenario>,
    price_index: PriceIndex,
    latest_results: RwLock<Option<Arc<RunResults>>>,
    running: AtomicBool,
    cancel_requested: AtomicBool,
}

impl Default for AnalysisSession {
    fn default() -> Self {
        Self::new(Scenario::default())
    }
}

struct RunGuard<'a> {
    running: &'a AtomicBool,
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.running.store(false, Ordering::Release);
    }
}

impl AnalysisSession {
    pub fn new(scenario: Scenario) -> Self {
        Self::with_price_index(scenario, PriceIndex::cpi())
    }

    pub fn with_price_index(scenario: Scenario, price_index: PriceIndex) -> Self {
        Self {
            scenario: RwLock::new(scenario),
            price_index,
            latest_results: RwLock::new(None),
            running: AtomicBool::new(false),
            cancel_requested: AtomicBool::new(false),
        }
    }

    pub fn scenario(&self) -> Scenario {
        self.scenario.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn update_scenario<T, F>(&self, edit: F) -> T
    where
        F: FnOnce(&mut Scenario) -> T,
    {
        let mut scenario = self.scenario.write().unwrap_or_else(PoisonError::into_inner);
        edit(&mut scenario)
    }

    pub fn add_custom_treatment(&self, name: &str) -> LccaResult<Treatment> {
        self.update_scenario(|s| s.treatments.add_custom(name).cloned())
    }

    pub fn remove_treatment(&self, name: &str) -> LccaResult<Treatment> {
        self.update_scenario(|s| s.treatments.remove(name))
    }

    pub fn add_alternative(&self) -> String {
        self.update_scenario(|s| {
            let name = Alternative::default_name(s.alternatives.len());
            s.alternatives.push(Alternative::new(name.clone()));
            name
        })
    }

    pub fn latest_results(&self) -> Option<Arc<RunResults>> {
        self.latest_results.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    // Asks an active run to stop at its next batch boundary.
    pub fn cancel(&self) {
        self.cancel_requested.store(true, Ordering::Release);
    }

    fn begin_run(&self) -> LccaResult<RunGuard<'_>> {
        self.running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| LccaError::RunInProgress)?;
        self.cancel_requested.store(false, Ordering::Release);
        Ok(RunGuard { running: &self.running })
    }

    /// Runs both analyzers. Fails with `RunInProgress` if another run is
    /// active; on any error the previous results are kept.
    pub fn run(&self) -> LccaResult<Arc<RunResults>> {
        let _guard = self.begin_run()?;
        let snapshot = self.scenario();

        let results = match run_analysis_with_cancel(&snapshot, &self.price_index, &self.cancel_requested) {
            Ok(results) => Arc::new(results),
            Err(e) => {
                tracing::warn!(error = %e, "Analysis run did not complete");
                return Err(e);
            }
        };

        let mut latest = self.latest_results.write().unwrap_or_else(PoisonError::into_inner);
        *latest = Some(Arc::clone(&results));
        Ok(results)
    }
}
