//! Background job scheduler and job implementations.

mod event_instances;
mod pool_metrics;
mod scheduler;

pub use event_instances::EventInstancesJob;
pub use pool_metrics::PoolMetricsJob;
pub use scheduler::JobScheduler;
