use crate::actor;
use crate::cloud_provider::{CloudProvider, NodeGroup, UthoCloudProvider};
use act_zero::runtimes::tokio::Timer;
use act_zero::timer::Tick;
use act_zero::{send, Actor, ActorError, ActorResult, Addr, Produces, WeakAddr};
use async_trait::async_trait;
use std::fmt;
use std::time::Duration;
use tracing::{info, warn};

/// Periodically refreshes the provider's node groups and reports their state.
pub struct ControlLoop {
    cloud_provider: UthoCloudProvider,
    scan_interval: Duration,
    timer: Timer,
    addr: WeakAddr<Self>,
}

impl ControlLoop {
    pub fn new(cloud_provider: UthoCloudProvider, scan_interval: Duration) -> Self {
        Self {
            cloud_provider,
            scan_interval,
            timer: Default::default(),
            addr: Default::default(),
        }
    }
}

impl fmt::Display for ControlLoop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ControlLoop ({} cluster {})",
            self.cloud_provider.name(),
            self.cloud_provider.manager().cluster_id()
        )
    }
}

#[async_trait]
impl Actor for ControlLoop {
    #[tracing::instrument(name = "ControlLoop::started", skip(self, addr))]
    async fn started(&mut self, addr: Addr<Self>) -> ActorResult<()>
    where
        Self: Sized,
    {
        info!("Started {}", self);
        self.addr = addr.downgrade();

        self.timer
            .set_interval_weak(self.addr.clone(), self.scan_interval);

        Produces::ok(())
    }

    async fn error(&mut self, error: ActorError) -> bool {
        actor::handle_error(error)
    }
}

#[async_trait]
impl Tick for ControlLoop {
    async fn tick(&mut self) -> ActorResult<()> {
        if self.timer.tick() {
            send!(self.addr.reconcile());
        }

        Produces::ok(())
    }
}

impl ControlLoop {
    /// Refreshes the node groups and returns how many are managed.
    #[tracing::instrument(name = "ControlLoop::reconcile", skip(self))]
    pub async fn reconcile(&mut self) -> ActorResult<usize> {
        self.cloud_provider
            .refresh()
            .await
            .map_err(actor::Error::from)?;

        let node_groups = self.cloud_provider.node_groups();
        for ng in &node_groups {
            match ng.target_size() {
                Ok(target_size) => info!(target_size, "{}", ng.debug()),
                Err(e) => warn!("{}: failed to read target size: {}", ng.debug(), e),
            }
        }

        Produces::ok(node_groups.len())
    }
}
