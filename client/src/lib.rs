mod config;
mod election;
mod error;
mod gateway;
#[cfg(feature = "web")]
mod injected;
mod provider;
mod reader;
mod rpc;
mod scanner;
mod session;
mod wallet;

pub use config::*;
pub use election::*;
pub use error::*;
pub use gateway::*;
#[cfg(feature = "web")]
pub use injected::*;
pub use provider::*;
pub use reader::*;
pub use rpc::*;
pub use scanner::*;
pub use session::*;
pub use wallet::*;

/// Current unix time in seconds.
#[cfg(all(feature = "web", target_arch = "wasm32"))]
pub fn unix_now() -> u64 {
    (js_sys::Date::now() / 1000.0) as u64
}

/// Current unix time in seconds.
#[cfg(not(all(feature = "web", target_arch = "wasm32")))]
pub fn unix_now() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

/// Waits `millis` milliseconds on the platform timer.
pub async fn sleep_ms(millis: u32) {
    #[cfg(target_arch = "wasm32")]
    gloo_timers::future::TimeoutFuture::new(millis).await;

    #[cfg(not(target_arch = "wasm32"))]
    tokio::time::sleep(std::time::Duration::from_millis(millis as u64)).await;
}
