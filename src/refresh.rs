//! Background weather refresh system
//!
//! Re-fetches the active location's weather on a fixed interval (default 30
//! minutes) and on manual request, communicating updates to the dashboard
//! over a tokio channel. There is no automatic retry: a failed cycle
//! surfaces as an error message and the next attempt is either the next
//! tick or a manual request.

use std::time::Duration;
use tokio::sync::mpsc;

use crate::data::{OpenWeatherClient, WeatherData};

/// Messages sent from the background refresh task to the dashboard
#[derive(Debug, Clone)]
pub enum RefreshMessage {
    /// A refresh cycle is starting
    RefreshStarted,
    /// Fresh weather data for the active location
    WeatherUpdated(WeatherData),
    /// The refresh cycle failed; retryable by the user
    RefreshError(String),
    /// The refresh cycle finished (successfully or not)
    RefreshCompleted,
}

/// Commands accepted by the background refresh task
#[derive(Debug, Clone)]
enum RefreshCommand {
    /// Refresh immediately instead of waiting for the next tick
    RefreshNow,
    /// Switch the active location and refresh immediately
    SetLocation { lat: f64, lon: f64 },
}

/// Configuration for the refresh interval
#[derive(Debug, Clone)]
pub struct RefreshConfig {
    /// Interval between automatic refreshes
    pub interval: Duration,
    /// Whether auto-refresh is enabled
    pub enabled: bool,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(30 * 60), // 30 minutes
            enabled: true,
        }
    }
}

/// Handle for controlling the background refresh task
pub struct RefreshHandle {
    /// Channel for receiving refresh messages
    pub receiver: mpsc::Receiver<RefreshMessage>,
    /// Channel for sending commands to the task
    command_tx: mpsc::Sender<RefreshCommand>,
    /// Flag to signal shutdown
    shutdown_tx: mpsc::Sender<()>,
}

impl RefreshHandle {
    /// Creates a RefreshHandle and spawns the background refresh task
    ///
    /// The first automatic tick fires one full interval after spawning;
    /// callers wanting immediate data should use `request_refresh`.
    ///
    /// # Arguments
    /// * `client` - Provider client used to fetch weather
    /// * `config` - Refresh interval configuration
    /// * `lat` - Latitude of the initially active location
    /// * `lon` - Longitude of the initially active location
    ///
    /// # Returns
    /// A RefreshHandle that receives updates via the `receiver` channel
    pub fn spawn(client: OpenWeatherClient, config: RefreshConfig, lat: f64, lon: f64) -> Self {
        let (msg_tx, msg_rx) = mpsc::channel(32);
        let (command_tx, mut command_rx) = mpsc::channel::<RefreshCommand>(8);
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);

        tokio::spawn(async move {
            let mut lat = lat;
            let mut lon = lon;
            let mut interval = tokio::time::interval(config.interval);
            // Skip the first tick (immediate)
            interval.tick().await;

            loop {
                tokio::select! {
                    _ = interval.tick(), if config.enabled => {
                        run_cycle(&client, &msg_tx, lat, lon).await;
                    }
                    command = command_rx.recv() => {
                        match command {
                            Some(RefreshCommand::RefreshNow) => {
                                run_cycle(&client, &msg_tx, lat, lon).await;
                            }
                            Some(RefreshCommand::SetLocation { lat: new_lat, lon: new_lon }) => {
                                lat = new_lat;
                                lon = new_lon;
                                run_cycle(&client, &msg_tx, lat, lon).await;
                            }
                            None => break,
                        }
                    }
                    _ = shutdown_rx.recv() => break,
                }
            }
        });

        Self {
            receiver: msg_rx,
            command_tx,
            shutdown_tx,
        }
    }

    /// Requests an immediate refresh of the active location
    pub async fn request_refresh(&self) {
        let _ = self.command_tx.send(RefreshCommand::RefreshNow).await;
    }

    /// Switches the active location and refreshes it immediately
    pub async fn set_location(&self, lat: f64, lon: f64) {
        let _ = self
            .command_tx
            .send(RefreshCommand::SetLocation { lat, lon })
            .await;
    }

    /// Shuts down the background refresh task
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
    }
}

/// Runs one refresh cycle, reporting start, outcome and completion
async fn run_cycle(
    client: &OpenWeatherClient,
    msg_tx: &mpsc::Sender<RefreshMessage>,
    lat: f64,
    lon: f64,
) {
    let _ = msg_tx.send(RefreshMessage::RefreshStarted).await;

    match client.fetch_weather(lat, lon).await {
        Ok(data) => {
            let _ = msg_tx.send(RefreshMessage::WeatherUpdated(data)).await;
        }
        Err(e) => {
            let _ = msg_tx.send(RefreshMessage::RefreshError(e.to_string())).await;
        }
    }

    let _ = msg_tx.send(RefreshMessage::RefreshCompleted).await;
}

/// Checks for pending refresh messages without blocking
///
/// # Arguments
/// * `handle` - The RefreshHandle to check
///
/// # Returns
/// * `Some(RefreshMessage)` if a message was available
/// * `None` if no messages are pending
pub fn try_recv(handle: &mut RefreshHandle) -> Option<RefreshMessage> {
    handle.receiver.try_recv().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECV_TIMEOUT: Duration = Duration::from_secs(5);

    fn unroutable_client() -> OpenWeatherClient {
        OpenWeatherClient::with_base_urls(
            "test-key",
            "http://127.0.0.1:1/data",
            "http://127.0.0.1:1/geo",
        )
    }

    async fn recv(handle: &mut RefreshHandle) -> RefreshMessage {
        tokio::time::timeout(RECV_TIMEOUT, handle.receiver.recv())
            .await
            .expect("timed out waiting for refresh message")
            .expect("refresh channel closed")
    }

    #[test]
    fn test_refresh_config_default() {
        let config = RefreshConfig::default();
        assert_eq!(config.interval, Duration::from_secs(1800));
        assert!(config.enabled);
    }

    #[tokio::test]
    async fn test_no_messages_before_first_tick() {
        let config = RefreshConfig {
            interval: Duration::from_secs(3600),
            enabled: true,
        };
        let mut handle = RefreshHandle::spawn(unroutable_client(), config, 49.28, -123.12);

        // Well before the first tick nothing should have been sent
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(try_recv(&mut handle).is_none());
    }

    #[tokio::test]
    async fn test_manual_refresh_reports_error_and_completion() {
        let config = RefreshConfig {
            interval: Duration::from_secs(3600),
            enabled: false,
        };
        let mut handle = RefreshHandle::spawn(unroutable_client(), config, 49.28, -123.12);

        handle.request_refresh().await;

        match recv(&mut handle).await {
            RefreshMessage::RefreshStarted => {}
            other => panic!("Expected RefreshStarted, got {:?}", other),
        }
        match recv(&mut handle).await {
            RefreshMessage::RefreshError(message) => assert!(!message.is_empty()),
            other => panic!("Expected RefreshError, got {:?}", other),
        }
        match recv(&mut handle).await {
            RefreshMessage::RefreshCompleted => {}
            other => panic!("Expected RefreshCompleted, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_set_location_triggers_refresh() {
        let config = RefreshConfig {
            interval: Duration::from_secs(3600),
            enabled: false,
        };
        let mut handle = RefreshHandle::spawn(unroutable_client(), config, 49.28, -123.12);

        handle.set_location(51.51, -0.13).await;

        match recv(&mut handle).await {
            RefreshMessage::RefreshStarted => {}
            other => panic!("Expected RefreshStarted, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_shutdown_stops_task() {
        let config = RefreshConfig {
            interval: Duration::from_secs(3600),
            enabled: false,
        };
        let mut handle = RefreshHandle::spawn(unroutable_client(), config, 49.28, -123.12);

        let _ = handle.shutdown_tx.send(()).await;

        // Once the task exits it drops its sender and the channel closes
        let closed = tokio::time::timeout(RECV_TIMEOUT, handle.receiver.recv())
            .await
            .expect("timed out waiting for channel close");
        assert!(closed.is_none());
    }
}
