pub mod server;

use tokio::{task::JoinSet, time::sleep};

use crate::{prelude::*, state::AppState};

/// Delay before a crashed service is started again.
const RESTART_DELAY: Duration = Duration::from_secs(5);

#[async_trait::async_trait]
pub trait Plugin: Send + Sync {
  fn name(&self) -> &'static str {
    std::any::type_name::<Self>()
  }

  async fn start(&self, app: Arc<AppState>) -> anyhow::Result<()>;
}

#[derive(Default)]
pub struct App {
  plugins: Vec<Arc<dyn Plugin>>,
}

impl App {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn register<P: Plugin + 'static>(mut self, plugin: P) -> Self {
    self.plugins.push(Arc::new(plugin));
    self
  }

  /// Supervises every registered service until Ctrl-C.
  pub async fn run(self, app: Arc<AppState>) -> anyhow::Result<()> {
    let mut services = JoinSet::new();
    for plugin in self.plugins {
      services.spawn(supervise(plugin, app.clone()));
    }

    tokio::signal::ctrl_c()
      .await
      .context("Failed to listen for shutdown signal")?;

    info!("SYSTEM: Shutdown requested, stopping {} service(s)", services.len());
    services.shutdown().await;
    Ok(())
  }
}

async fn supervise(plugin: Arc<dyn Plugin>, app: Arc<AppState>) {
  let name = plugin.name();
  info!("SYSTEM: Service `{name}` initialized");

  loop {
    let app = app.clone();
    let plugin = plugin.clone();

    // a panic inside the service surfaces as a JoinError here
    let handle = tokio::spawn(async move { plugin.start(app).await });
    let abort = handle.abort_handle();

    let result = {
      let _guard = AbortOnDrop(abort);
      handle.await
    };

    match result {
      Ok(Ok(())) => warn!("Service `{name}` stopped unexpectedly (Ok)."),
      Ok(Err(err)) => error!("Service `{name}` crashed with error: {err:#}."),
      Err(err) if err.is_cancelled() => {
        info!("Service `{name}` shutdown.");
        break;
      }
      Err(_) => error!("Service `{name}` PANICKED!"),
    }

    sleep(RESTART_DELAY).await;
    info!("SYSTEM: Restarting service `{name}`...");
  }
}

/// Stops the service task when its supervisor is cancelled.
struct AbortOnDrop(tokio::task::AbortHandle);

impl Drop for AbortOnDrop {
  fn drop(&mut self) {
    self.0.abort();
  }
}
