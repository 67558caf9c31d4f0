//! Shared fakes for worker integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use quotas_core::usage::MetricSample;
use quotas_db::models::resource_usage::{ResourceUsage, UpsertResourceUsage};
use quotas_db::UsageStore;
use quotas_worker::plugins::{Metric, Publisher};

type Key = (String, String, String);

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

/// `UsageStore` backed by a map, recording every call.
#[derive(Default)]
pub struct InMemoryStore {
    rows: Mutex<HashMap<Key, ResourceUsage>>,
    upserts: Mutex<Vec<UpsertResourceUsage>>,
    gets: AtomicUsize,
    next_id: AtomicUsize,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every upsert received, in call order.
    pub fn upserts(&self) -> Vec<UpsertResourceUsage> {
        self.upserts.lock().unwrap().clone()
    }

    pub fn get_calls(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }

    pub fn row_count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    pub fn value_of(&self, object_type: &str, object_id: &str, metric: &str) -> Option<i64> {
        self.rows
            .lock()
            .unwrap()
            .get(&key(object_type, object_id, metric))
            .map(|u| u.value)
    }

    /// Seed a stored record directly.
    pub fn seed(&self, object_type: &str, object_id: &str, metric: &str, value: i64) {
        self.write(UpsertResourceUsage {
            object_type: object_type.to_string(),
            object_id: object_id.to_string(),
            metric: metric.to_string(),
            value,
        });
    }

    fn write(&self, usage: UpsertResourceUsage) {
        let now = Utc::now();
        let mut rows = self.rows.lock().unwrap();
        let k = key(&usage.object_type, &usage.object_id, &usage.metric);
        match rows.get_mut(&k) {
            Some(existing) => {
                existing.value = usage.value;
                existing.modified = now;
            }
            None => {
                let id = self.next_id.fetch_add(1, Ordering::SeqCst) as i64 + 1;
                rows.insert(
                    k,
                    ResourceUsage {
                        id,
                        object_type: usage.object_type,
                        object_id: usage.object_id,
                        metric: usage.metric,
                        value: usage.value,
                        modified: now,
                        created_at: now,
                    },
                );
            }
        }
    }
}

fn key(object_type: &str, object_id: &str, metric: &str) -> Key {
    (
        object_type.to_string(),
        object_id.to_string(),
        metric.to_string(),
    )
}

#[async_trait]
impl UsageStore for InMemoryStore {
    async fn upsert(&self, usage: &UpsertResourceUsage) -> Result<(), sqlx::Error> {
        self.upserts.lock().unwrap().push(usage.clone());
        self.write(usage.clone());
        Ok(())
    }

    async fn get(
        &self,
        object_type: &str,
        object_id: &str,
        metric: &str,
    ) -> Result<Option<ResourceUsage>, sqlx::Error> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .rows
            .lock()
            .unwrap()
            .get(&key(object_type, object_id, metric))
            .cloned())
    }
}

// ---------------------------------------------------------------------------
// Metrics
// ---------------------------------------------------------------------------

/// Metric provider returning a fixed set of samples.
pub struct StaticMetric {
    pub object_type: &'static str,
    pub metric_id: &'static str,
    pub samples: Vec<MetricSample>,
    calls: AtomicUsize,
}

impl StaticMetric {
    pub fn new(
        object_type: &'static str,
        metric_id: &'static str,
        samples: Vec<MetricSample>,
    ) -> Self {
        Self {
            object_type,
            metric_id,
            samples,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Metric for StaticMetric {
    fn object_type(&self) -> &str {
        self.object_type
    }

    fn metric_id(&self) -> &str {
        self.metric_id
    }

    async fn all(&self) -> anyhow::Result<Vec<MetricSample>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.samples.clone())
    }
}

/// Metric provider whose `all()` always fails.
pub struct FailingMetric;

#[async_trait]
impl Metric for FailingMetric {
    fn object_type(&self) -> &str {
        "volume"
    }

    fn metric_id(&self) -> &str {
        "afs"
    }

    async fn all(&self) -> anyhow::Result<Vec<MetricSample>> {
        anyhow::bail!("volume server unreachable")
    }
}

// ---------------------------------------------------------------------------
// Publishers
// ---------------------------------------------------------------------------

/// Publisher that remembers every batch it was handed.
#[derive(Default)]
pub struct RecordingPublisher {
    batches: Mutex<Vec<Vec<ResourceUsage>>>,
}

impl RecordingPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn batches(&self) -> Vec<Vec<ResourceUsage>> {
        self.batches.lock().unwrap().clone()
    }
}

#[async_trait]
impl Publisher for RecordingPublisher {
    async fn publish(&self, usages: Vec<ResourceUsage>) -> anyhow::Result<()> {
        self.batches.lock().unwrap().push(usages);
        Ok(())
    }
}

/// Publisher whose `publish()` always fails.
pub struct FailingPublisher;

#[async_trait]
impl Publisher for FailingPublisher {
    async fn publish(&self, _usages: Vec<ResourceUsage>) -> anyhow::Result<()> {
        anyhow::bail!("remote rejected payload")
    }
}
