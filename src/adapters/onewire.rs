//! DS18B20 one-wire bus adapter.
//!
//! Implements [`SensorBusPort`]: one raw °C reading per probe index,
//! with `-127.0` for a probe that did not answer — the same value the
//! Dallas ROM command set reports, so no translation happens here.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: talks to the RMT-based onewire bus on GPIO 15.
//! On host/test: reads per-channel values from static atomics for
//! injection.

use core::sync::atomic::AtomicU32;
#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::Ordering;

use crate::app::ports::SensorBusPort;
use crate::sensors::temperature::FAULT_SENTINEL_C;
use crate::sensors::SENSOR_CHANNELS;

// f32 bit patterns; seeded with the fault sentinel so the system sees
// "no probe yet" until the first injection or real conversion.
static SIM_CHANNELS: [AtomicU32; SENSOR_CHANNELS] = [
    AtomicU32::new(FAULT_SENTINEL_C.to_bits()),
    AtomicU32::new(FAULT_SENTINEL_C.to_bits()),
    AtomicU32::new(FAULT_SENTINEL_C.to_bits()),
];

/// Inject a reading for one channel (host/test only).
#[cfg(not(target_os = "espidf"))]
pub fn sim_set_channel(channel: usize, celsius: f32) {
    SIM_CHANNELS[channel].store(celsius.to_bits(), Ordering::Relaxed);
}

/// Simulate a dead probe on one channel (host/test only).
#[cfg(not(target_os = "espidf"))]
pub fn sim_set_fault(channel: usize) {
    sim_set_channel(channel, FAULT_SENTINEL_C);
}

pub struct OneWireBusAdapter {
    _data_gpio: i32,
}

impl OneWireBusAdapter {
    pub fn new(data_gpio: i32) -> Self {
        Self {
            _data_gpio: data_gpio,
        }
    }

    #[cfg(target_os = "espidf")]
    fn read_hw(&mut self, channel: usize) -> f32 {
        // DS18B20 over the ESP-IDF RMT onewire component.
        //
        // The full wiring requires:
        // 1. onewire_new_bus_rmt(&bus_cfg, &rmt_cfg, &bus) on _data_gpio
        // 2. device enumeration once at boot (onewire_device_iter) —
        //    bus order defines the channel index, matching the probe
        //    labelling on the board
        // 3. per poll: ds18b20_trigger_temperature_conversion(bus, addr)
        //    then ds18b20_get_temperature(bus, addr, &out)
        //
        // Until the RMT component is linked into this build, report
        // every probe as absent; the sampler degrades this to invalid
        // samples and the relay logic keeps its fail-safe behavior.
        let _ = channel;
        FAULT_SENTINEL_C
    }

    #[cfg(not(target_os = "espidf"))]
    fn read_hw(&mut self, channel: usize) -> f32 {
        f32::from_bits(SIM_CHANNELS[channel].load(Ordering::Relaxed))
    }
}

impl SensorBusPort for OneWireBusAdapter {
    fn read_channel(&mut self, channel: usize) -> f32 {
        if channel >= SENSOR_CHANNELS {
            return FAULT_SENTINEL_C;
        }
        self.read_hw(channel)
    }
}
