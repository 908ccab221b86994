//! Global config with atomic reload support.
//!
//! Uses `arc-swap` for lock-free reads and atomic config replacement.
//! This enables hot-reloading of `bedbug.toml` during watch mode.
//!
//! ```text
//!   rayon page renderers ──► cfg() (lock-free load)
//!   serve request thread ──► cfg()
//!   watch thread ──────────► reload_config() (atomic replace)
//! ```

use super::SiteConfig;
use anyhow::{Result, anyhow};
use arc_swap::ArcSwap;
use std::{
    fs,
    sync::{
        Arc, LazyLock,
        atomic::{AtomicU64, Ordering},
    },
};

// =============================================================================
// Global State
// =============================================================================

/// Global config storage with atomic replacement support.
///
/// Initialized with default config, then replaced with the loaded config in main.
pub static CONFIG: LazyLock<ArcSwap<SiteConfig>> =
    LazyLock::new(|| ArcSwap::from_pointee(SiteConfig::default()));

/// Hash of the config file content behind the current `CONFIG`.
static CONFIG_HASH: AtomicU64 = AtomicU64::new(0);

// =============================================================================
// Public API
// =============================================================================

/// Get current config as `Arc<SiteConfig>`.
///
/// Lock-free read via atomic load. Suitable for hot paths in rayon parallel contexts.
#[inline]
pub fn cfg() -> Arc<SiteConfig> {
    CONFIG.load_full()
}

/// Initialize global config (called once at startup).
pub fn init_config(config: SiteConfig) {
    if let Ok(content) = fs::read_to_string(&config.config_path) {
        CONFIG_HASH.store(crate::utils::hash::compute(content.as_bytes()), Ordering::Relaxed);
    }
    CONFIG.store(Arc::new(config));
}

/// Replace config atomically (called when bedbug.toml changes).
///
/// Returns `true` if config was actually updated, `false` if content matches last load.
/// Readers holding the old `Arc` keep a consistent view until they drop it.
pub fn reload_config() -> Result<bool> {
    let current = cfg();
    let cli = current
        .cli
        .ok_or_else(|| anyhow!("config was not initialized from the command line"))?;

    // File might be mid-save; bubble the error up and retry on the next event
    let content = fs::read_to_string(&current.config_path)?;
    let new_hash = crate::utils::hash::compute(content.as_bytes());
    if new_hash == CONFIG_HASH.load(Ordering::Relaxed) {
        return Ok(false);
    }

    let new_config = SiteConfig::load(cli)?;
    new_config.validate()?;
    CONFIG.store(Arc::new(new_config));
    CONFIG_HASH.store(new_hash, Ordering::Relaxed);
    Ok(true)
}
