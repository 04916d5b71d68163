use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use perm_tracker::workflows::perm::{
    CaseId, CaseRepository, DeadlinePolicy, PermCase, RepositoryError,
};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) deadlines: DeadlinePolicy,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryCaseRepository {
    cases: Arc<Mutex<HashMap<CaseId, PermCase>>>,
}

impl InMemoryCaseRepository {
    fn lock(&self) -> Result<MutexGuard<'_, HashMap<CaseId, PermCase>>, RepositoryError> {
        self.cases
            .lock()
            .map_err(|_| RepositoryError::Unavailable("case store mutex poisoned".to_string()))
    }
}

impl CaseRepository for InMemoryCaseRepository {
    fn insert(&self, case: PermCase) -> Result<PermCase, RepositoryError> {
        let mut guard = self.lock()?;
        if guard.contains_key(&case.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(case.id.clone(), case.clone());
        Ok(case)
    }

    fn get(&self, id: &CaseId) -> Result<Option<PermCase>, RepositoryError> {
        Ok(self.lock()?.get(id).cloned())
    }

    fn update(&self, case: PermCase) -> Result<(), RepositoryError> {
        let mut guard = self.lock()?;
        if guard.contains_key(&case.id) {
            guard.insert(case.id.clone(), case);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn remove(&self, id: &CaseId) -> Result<(), RepositoryError> {
        self.lock()?
            .remove(id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }

    fn list(&self) -> Result<Vec<PermCase>, RepositoryError> {
        let mut cases: Vec<PermCase> = self.lock()?.values().cloned().collect();
        cases.sort_by(|left, right| left.id.0.cmp(&right.id.0));
        Ok(cases)
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn deserialize_optional_date<'de, D>(
    deserializer: D,
) -> Result<Option<NaiveDate>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    opt.map(|value| parse_date(&value).map_err(serde::de::Error::custom))
        .transpose()
}
