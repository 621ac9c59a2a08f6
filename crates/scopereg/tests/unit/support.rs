//! Shared fixtures for the unit suite
//!
//! A handful of small modules modeled on what a real application would
//! register: configuration at the root, a logger in a child scope, a
//! telemetry module providing more than one capability.

use std::any::Any;
use std::sync::Once;

use scopereg::{CapabilityId, Module};

static INIT: Once = Once::new();

/// Install a subscriber once so `SCOPEREG_LOG=debug cargo test` shows output
pub fn init_logging() {
    INIT.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_env("SCOPEREG_LOG")
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("off"));
        let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
    });
}

pub const CONFIG: CapabilityId = CapabilityId::new("config");
pub const LOGGER: CapabilityId = CapabilityId::new("logger");
pub const METRICS: CapabilityId = CapabilityId::new("metrics");

pub struct ConfigModule {
    pub endpoint: &'static str,
}

impl Module for ConfigModule {
    fn provides(&self) -> &[CapabilityId] {
        &[CONFIG]
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub struct LoggerModule {
    pub level: &'static str,
}

impl Module for LoggerModule {
    fn provides(&self) -> &[CapabilityId] {
        &[LOGGER]
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A module satisfying two capabilities at once
pub struct TelemetryModule {
    pub sink: &'static str,
}

impl Module for TelemetryModule {
    fn provides(&self) -> &[CapabilityId] {
        &[LOGGER, METRICS]
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
