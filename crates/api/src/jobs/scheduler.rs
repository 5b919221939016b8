//! Background job scheduling.
//!
//! Jobs run on fixed intervals inside the server process and stop together
//! when the server shuts down. A failing run is logged and counted; it does
//! not unschedule the job.

use std::sync::Arc;
use std::time::Duration;

use metrics::counter;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// How often a job runs.
#[derive(Debug, Clone, Copy)]
pub enum JobFrequency {
    /// Every N seconds.
    Seconds(u64),
    /// Every hour.
    Hourly,
}

impl JobFrequency {
    /// Interval between two runs.
    pub fn period(&self) -> Duration {
        match self {
            JobFrequency::Seconds(secs) => Duration::from_secs(*secs),
            JobFrequency::Hourly => Duration::from_secs(3600),
        }
    }
}

/// A unit of recurring background work.
#[async_trait::async_trait]
pub trait Job: Send + Sync {
    /// Stable name, used in logs and metrics labels.
    fn name(&self) -> &'static str;

    fn frequency(&self) -> JobFrequency;

    async fn execute(&self) -> Result<(), String>;
}

async fn run_once(job: &dyn Job) {
    let name = job.name();
    let start = std::time::Instant::now();
    match job.execute().await {
        Ok(()) => {
            counter!("job_runs_total", "job" => name, "status" => "ok").increment(1);
            info!(
                job = name,
                elapsed_ms = start.elapsed().as_millis(),
                "Job run completed"
            );
        }
        Err(err) => {
            counter!("job_runs_total", "job" => name, "status" => "error").increment(1);
            error!(
                job = name,
                elapsed_ms = start.elapsed().as_millis(),
                error = %err,
                "Job run failed"
            );
        }
    }
}

/// Runs registered jobs on their intervals until shutdown is signaled.
pub struct JobScheduler {
    jobs: Vec<Arc<dyn Job>>,
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
    handles: Vec<JoinHandle<()>>,
}

impl JobScheduler {
    pub fn new() -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        Self {
            jobs: Vec::new(),
            shutdown_tx,
            shutdown_rx,
            handles: Vec::new(),
        }
    }

    /// Register a job; takes effect on the next `start`.
    pub fn register<J: Job + 'static>(&mut self, job: J) {
        self.jobs.push(Arc::new(job));
    }

    /// Spawn one task per registered job.
    pub fn start(&mut self) {
        info!(jobs = self.jobs.len(), "Starting background jobs");

        for job in &self.jobs {
            let job = Arc::clone(job);
            let mut shutdown_rx = self.shutdown_rx.clone();

            self.handles.push(tokio::spawn(async move {
                let name = job.name();
                let mut ticker = tokio::time::interval(job.frequency().period());
                // The first tick fires immediately; skip it so a crash-restart
                // loop cannot hammer the database.
                ticker.tick().await;
                info!(job = name, "Job scheduled");

                loop {
                    tokio::select! {
                        _ = ticker.tick() => run_once(job.as_ref()).await,
                        _ = shutdown_rx.changed() => {
                            if *shutdown_rx.borrow() {
                                info!(job = name, "Job stopped");
                                break;
                            }
                        }
                    }
                }
            }));
        }
    }

    /// Signal all jobs to stop after their current run.
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(true);
    }

    /// Wait for job tasks to finish, up to `timeout`.
    pub async fn wait_for_shutdown(self, timeout: Duration) {
        let drain = async {
            for handle in self.handles {
                if let Err(err) = handle.await {
                    warn!(error = %err, "Job task panicked");
                }
            }
        };

        if tokio::time::timeout(timeout, drain).await.is_err() {
            warn!(timeout = ?timeout, "Background jobs did not stop in time");
        } else {
            info!("Background jobs stopped");
        }
    }
}

impl Default for JobScheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingJob {
        run_count: Arc<AtomicUsize>,
    }

    #[async_trait::async_trait]
    impl Job for CountingJob {
        fn name(&self) -> &'static str {
            "counting_job"
        }

        fn frequency(&self) -> JobFrequency {
            JobFrequency::Seconds(1)
        }

        async fn execute(&self) -> Result<(), String> {
            self.run_count.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[test]
    fn test_frequency_period() {
        assert_eq!(
            JobFrequency::Seconds(10).period(),
            Duration::from_secs(10)
        );
        assert_eq!(JobFrequency::Hourly.period(), Duration::from_secs(3600));
    }

    #[test]
    fn test_register_queues_jobs() {
        let mut scheduler = JobScheduler::new();
        scheduler.register(CountingJob {
            run_count: Arc::new(AtomicUsize::new(0)),
        });
        assert_eq!(scheduler.jobs.len(), 1);
    }

    #[tokio::test]
    async fn test_shutdown_stops_running_jobs() {
        let mut scheduler = JobScheduler::new();
        scheduler.register(CountingJob {
            run_count: Arc::new(AtomicUsize::new(0)),
        });
        scheduler.start();
        scheduler.shutdown();
        // Completes only if every job task observed the signal and exited.
        scheduler.wait_for_shutdown(Duration::from_secs(5)).await;
    }
}
