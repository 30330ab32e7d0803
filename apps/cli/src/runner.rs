use anyhow::Result;
use gt_core::{BatchDriver, StopFlag};
use tokio::{signal, task};
use tracing::warn;

/// Runs `work` on the blocking pool while Ctrl-C raises the driver's stop flag.
///
/// The row in flight is finished before the batch stops.
pub async fn with_ctrl_c<T, F>(work: F) -> Result<T>
where
	T: Send + 'static,
	F: FnOnce(&BatchDriver) -> T + Send + 'static,
{
	let stop = StopFlag::new();
	let driver = BatchDriver::new(stop.clone());

	let listener = tokio::spawn(async move {
		if signal::ctrl_c().await.is_ok() {
			warn!("Stop requested, finishing the current photo");
			stop.stop();
		}
	});

	let output = task::spawn_blocking(move || work(&driver)).await;
	listener.abort();

	Ok(output?)
}
