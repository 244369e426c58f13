use crate::capture::sampler::PositionSampler;
use crate::processing::speed::SpeedPoller;
use crate::tracker::config::TrackerConfig;
use crate::tracker::store::SampleStore;

/// Everything owned by one element's registration
#[derive(Debug)]
pub struct TrackerState {
    pub(crate) store: SampleStore,
    pub(crate) sampler: PositionSampler,
    pub(crate) poller: SpeedPoller,
    pub(crate) config: TrackerConfig,
}

impl TrackerState {
    pub fn new(config: TrackerConfig) -> Self {
        Self {
            store: SampleStore::default(),
            sampler: PositionSampler::new(),
            poller: SpeedPoller::new(),
            config,
        }
    }

    pub fn store(&self) -> &SampleStore {
        &self.store
    }

    pub fn sampler(&self) -> &PositionSampler {
        &self.sampler
    }

    pub fn poller(&self) -> &SpeedPoller {
        &self.poller
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn current_speed(&self) -> f64 {
        self.store.current_speed()
    }
}
