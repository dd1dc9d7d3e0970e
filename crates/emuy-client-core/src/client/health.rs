use emuy_shared::{
    const_config::health::HEALTH_PATH,
    health::{HealthStatus, HealthSummary, ServiceHealth},
};
use emuy_time::{Milliseconds, Seconds, Timestamp};
use futures::channel::oneshot;
use tracing::{debug, warn};

use crate::{
    client::{deliver, map_reqwest_error, UiCallBack},
    configuration::{ClientConfiguration, HealthTarget},
    Client,
};

impl Client {
    /// Probes `{url}/health` giving up after the configured timeout. Never
    /// fails, every outcome is expressed in the returned [`ServiceHealth`].
    #[tracing::instrument(skip(ui_notify))]
    pub fn check_health<F: UiCallBack>(
        &self,
        target: &HealthTarget,
        ui_notify: F,
    ) -> oneshot::Receiver<ServiceHealth> {
        let timeout = self.config().health.timeout_secs;
        let name = target.name.clone();
        let url = format!("{}{HEALTH_PATH}", target.url);
        let request = self.api_client.get(&url).timeout(timeout.into());
        let (tx, rx) = oneshot::channel();
        let started = web_time::Instant::now();
        let on_done = move |resp: reqwest::Result<reqwest::Response>| async move {
            let latency = Milliseconds::from(started.elapsed());
            let outcome = resp
                .map(|r| r.status().as_u16())
                .map_err(map_reqwest_error);
            let result = ServiceHealth {
                name,
                url,
                status: HealthStatus::from_probe(outcome),
                latency,
                checked_at: Timestamp::now(),
            };
            deliver(tx, result);
            ui_notify();
        };
        reqwest_cross::fetch(request, on_done);
        rx
    }
}

/// Re-checks every target once per interval for as long as it is kept alive.
/// It does no work on its own, [`HealthMonitor::tick`] has to be called
/// regularly (every frame) and dropping the monitor stops the polling.
#[derive(Debug)]
pub struct HealthMonitor {
    targets: Vec<HealthTarget>,
    interval: Seconds,
    next_due: Timestamp,
    last_round: Option<Timestamp>,
    results: Vec<Option<ServiceHealth>>,
    pending: Vec<(usize, oneshot::Receiver<ServiceHealth>)>,
}

impl HealthMonitor {
    /// The first round starts on the first tick
    pub fn new(targets: Vec<HealthTarget>, interval: Seconds) -> Self {
        let results = vec![None; targets.len()];
        Self {
            targets,
            interval,
            next_due: Timestamp::now(),
            last_round: None,
            results,
            pending: Vec::new(),
        }
    }

    pub fn from_config(config: &ClientConfiguration) -> Self {
        Self::new(config.health.services.clone(), config.health.interval_secs)
    }

    /// Collects finished probes and starts a new round once one is due and
    /// the previous one has completed. Returns the time left until the next
    /// round so the caller can schedule a wake up.
    pub fn tick<F, N>(&mut self, client: &Client, make_notify: N) -> Seconds
    where
        F: UiCallBack,
        N: Fn() -> F,
    {
        self.collect();
        if self.pending.is_empty() && self.next_due.has_passed() {
            self.start_round(client, make_notify);
        }
        self.next_due.remaining()
    }

    /// Makes the next tick start a round (if none is running)
    pub fn check_now(&mut self) {
        self.next_due = Timestamp::now();
    }

    pub fn is_checking(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn last_round(&self) -> Option<Timestamp> {
        self.last_round
    }

    pub fn interval(&self) -> Seconds {
        self.interval
    }

    /// Each target with its latest result if one has arrived yet
    pub fn results(&self) -> impl Iterator<Item = (&HealthTarget, Option<&ServiceHealth>)> {
        self.targets
            .iter()
            .zip(self.results.iter().map(Option::as_ref))
    }

    /// Over the targets that have reported at least once
    pub fn summary(&self) -> HealthSummary {
        let reported: Vec<ServiceHealth> = self.results.iter().flatten().cloned().collect();
        HealthSummary::from_results(&reported)
    }

    fn start_round<F, N>(&mut self, client: &Client, make_notify: N)
    where
        F: UiCallBack,
        N: Fn() -> F,
    {
        debug!(count = self.targets.len(), "starting health check round");
        self.pending = self
            .targets
            .iter()
            .enumerate()
            .map(|(i, target)| (i, client.check_health(target, make_notify())))
            .collect();
        let now = Timestamp::now();
        self.last_round = Some(now);
        self.next_due = now + self.interval;
    }

    fn collect(&mut self) {
        let results = &mut self.results;
        self.pending.retain_mut(|(index, rx)| match rx.try_recv() {
            Ok(Some(health)) => {
                if let Some(slot) = results.get_mut(*index) {
                    *slot = Some(health);
                }
                false
            }
            Ok(None) => true,
            Err(oneshot::Canceled) => {
                warn!("health probe ended without reporting a result");
                false
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(name: &str) -> HealthTarget {
        HealthTarget {
            name: name.to_string(),
            url: format!("http://{name}.invalid"),
        }
    }

    #[test]
    fn new_monitor_is_due_immediately_with_no_results() {
        let monitor = HealthMonitor::new(vec![target("a"), target("b")], Seconds::new(60));
        assert!(monitor.next_due.has_passed());
        assert!(!monitor.is_checking());
        assert!(monitor.results().all(|(_, result)| result.is_none()));
        assert_eq!(monitor.summary(), HealthSummary::default());
    }

    #[test]
    fn collected_results_land_in_their_slot() {
        // Arrange
        let mut monitor = HealthMonitor::new(vec![target("a"), target("b")], Seconds::new(60));
        let (tx, rx) = oneshot::channel();
        let (_tx_pending, rx_pending) = oneshot::channel();
        monitor.pending = vec![(1, rx), (0, rx_pending)];
        tx.send(ServiceHealth {
            name: "b".to_string(),
            url: "http://b.invalid/health".to_string(),
            status: HealthStatus::Healthy,
            latency: Milliseconds::new(12),
            checked_at: Timestamp::now(),
        })
        .unwrap();

        // Act
        monitor.collect();

        // Assert
        let names: Vec<(&str, bool)> = monitor
            .results()
            .map(|(t, r)| (t.name.as_str(), r.is_some()))
            .collect();
        assert_eq!(names, [("a", false), ("b", true)]);
        assert!(monitor.is_checking());
        assert_eq!(monitor.summary().healthy, 1);
    }

    #[test]
    fn check_now_makes_round_due() {
        let mut monitor = HealthMonitor::new(vec![target("a")], Seconds::new(60));
        monitor.next_due = Timestamp::now() + Seconds::new(60);
        assert!(!monitor.next_due.has_passed());
        monitor.check_now();
        assert!(monitor.next_due.has_passed());
    }
}
