//! Fake transform backend for scheduler and runtime tests.

use std::collections::HashSet;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use stagehand::transform::{ScheduledTask, TransformBackend};
use stagehand::types::AssetClass;

/// Records which tasks were executed (in start order) and which artifact
/// classes were discarded; tasks listed via [`FakeBackend::fail_task`] fail
/// with a synthetic diagnostic instead of succeeding.
#[derive(Default)]
pub struct FakeBackend {
    executed: Arc<Mutex<Vec<String>>>,
    failing: Mutex<HashSet<String>>,
    delay: Mutex<Option<Duration>>,
    discarded: Arc<Mutex<Vec<AssetClass>>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_task(&self, name: &str) {
        self.failing.lock().unwrap().insert(name.to_string());
    }

    pub fn clear_failures(&self) {
        self.failing.lock().unwrap().clear();
    }

    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    pub fn executed(&self) -> Vec<String> {
        self.executed.lock().unwrap().clone()
    }

    pub fn clear_executed(&self) {
        self.executed.lock().unwrap().clear();
    }

    pub fn discarded(&self) -> Vec<AssetClass> {
        self.discarded.lock().unwrap().clone()
    }
}

impl TransformBackend for FakeBackend {
    fn run_task(
        &self,
        task: ScheduledTask,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send>> {
        let executed = Arc::clone(&self.executed);
        let fail = self.failing.lock().unwrap().contains(&task.name);
        let delay = *self.delay.lock().unwrap();

        Box::pin(async move {
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            executed.lock().unwrap().push(task.name.clone());
            if fail {
                anyhow::bail!("synthetic failure in {}", task.name);
            }
            Ok(())
        })
    }

    fn discard_artifacts(
        &self,
        class: AssetClass,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send>> {
        let discarded = Arc::clone(&self.discarded);
        Box::pin(async move {
            discarded.lock().unwrap().push(class);
            Ok(())
        })
    }
}
