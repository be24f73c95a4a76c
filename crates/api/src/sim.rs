//! Synthetic robot telemetry published into an [`InProcTable`].

#![forbid(unsafe_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::{InProcTable, TableValue};

const MODES: [&str; 3] = ["Disabled", "Autonomous", "Teleop"];
const MAX_SENSORS: u64 = 16;

pub struct Simulator {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl Simulator {
    /// Start publishing every `interval` until stopped or dropped.
    pub fn spawn(table: InProcTable, interval: Duration) -> std::io::Result<Self> {
        let stop = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stop);
        let handle = thread::Builder::new().name("ntdash-sim".into()).spawn(move || {
            info!(interval_ms = interval.as_millis() as u64, "sim: publishing");
            let mut tick = 0u64;
            while !flag.load(Ordering::Relaxed) {
                publish_tick(&table, tick);
                tick += 1;
                thread::sleep(interval);
            }
            debug!(ticks = tick, "sim: stopped");
        })?;
        Ok(Self { stop, handle: Some(handle) })
    }

    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(h) = self.handle.take() {
            let _ = h.join();
        }
    }
}

impl Drop for Simulator {
    fn drop(&mut self) {
        self.stop();
    }
}

/// One frame of telemetry. Deterministic in `tick`.
pub fn publish_tick(table: &InProcTable, tick: u64) {
    let t = tick as f64 / 10.0;
    let mode = MODES[((tick / 50) % MODES.len() as u64) as usize];
    let puts = [
        ("/SmartDashboard/Battery Voltage", TableValue::Double(((12.4 + 0.6 * t.sin()) * 100.0).round() / 100.0)),
        ("/SmartDashboard/Match Time", TableValue::Double(150.0 - (tick % 1500) as f64 / 10.0)),
        ("/SmartDashboard/Enabled", TableValue::Boolean(mode != "Disabled")),
        ("/SmartDashboard/Mode", TableValue::String(mode.to_string())),
        ("/FMSInfo/IsRedAlliance", TableValue::Boolean(true)),
        (
            "/SmartDashboard/Pose",
            TableValue::DoubleArray(vec![
                (2.0 * t.cos() * 100.0).round() / 100.0,
                (2.0 * t.sin() * 100.0).round() / 100.0,
                ((t * 57.3) % 360.0).round(),
            ]),
        ),
    ];
    for (k, v) in puts {
        if !table.put(k, v) {
            warn!(key = %k, "sim: publish refused");
        }
    }
    // a new sensor key shows up every couple of seconds
    let sensors = (tick / 20 + 1).min(MAX_SENSORS);
    for n in 0..sensors {
        let key = format!("/LiveWindow/Ungrouped/Sensor{}", n);
        let reading = ((t + n as f64).sin() * 1000.0).round() / 1000.0;
        table.put(&key, TableValue::Double(reading));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TableClient;

    #[test]
    fn tick_grows_sensor_keys() {
        let table = InProcTable::new();
        publish_tick(&table, 0);
        let base = table.len();
        assert!(table.get("/LiveWindow/Ungrouped/Sensor0").is_some());
        assert!(table.get("/LiveWindow/Ungrouped/Sensor1").is_none());
        publish_tick(&table, 40);
        assert_eq!(table.len(), base + 2);
        assert_eq!(table.get("/SmartDashboard/Mode"), Some(TableValue::String("Disabled".into())));
        publish_tick(&table, 60);
        assert_eq!(table.get("/SmartDashboard/Mode"), Some(TableValue::String("Autonomous".into())));
        assert_eq!(table.get("/SmartDashboard/Enabled"), Some(TableValue::Boolean(true)));
        table.shutdown();
    }
}
