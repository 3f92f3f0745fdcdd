//! Flash-backed settings persistence.
//!
//! Accepted settings live in a RAM cache for synchronous access and are
//! written back to a small `sequential-storage` map in the last flash
//! pages, behind the SoftDevice's flash driver.

use chalice_core::settings::{SettingsBackend, SettingsKey, SENTRY};
use core::ops::Range;
use embassy_sync::{blocking_mutex::raw::ThreadModeRawMutex, channel::Channel};
use heapless::LinearMap;
use nrf_softdevice::Flash;
use sequential_storage::{
    cache::NoCache,
    map::{fetch_item, store_item},
};

/// Last two 4K pages; memory.x keeps the application image clear of them.
const SETTINGS_FLASH_RANGE: Range<u32> = 0x7E000..0x80000;

/// Pending write-backs from the settings store to the flash task.
static FLASH_WRITES: Channel<ThreadModeRawMutex, (u8, i32), 4> = Channel::new();

pub struct FlashSettings {
    cache: LinearMap<u8, i32, { SENTRY as usize }>,
}

impl FlashSettings {
    /// Load every known key from the flash map on boot. A key that was
    /// never stored stays absent, which is not the same as zero.
    pub async fn load(flash: &mut Flash) -> Self {
        let mut cache = LinearMap::new();
        let mut buffer = [0u8; 32];
        for raw in 0..SENTRY {
            match fetch_item::<u8, i32, _>(
                flash,
                SETTINGS_FLASH_RANGE,
                &mut NoCache::new(),
                &mut buffer,
                &raw,
            )
            .await
            {
                Ok(Some(value)) => {
                    let _ = cache.insert(raw, value);
                }
                Ok(None) => {}
                Err(e) => defmt::warn!(
                    "settings: flash read failed for key {}: {}",
                    raw,
                    defmt::Debug2Format(&e)
                ),
            }
        }
        Self { cache }
    }
}

impl SettingsBackend for FlashSettings {
    fn read_i32(&self, key: SettingsKey) -> Option<i32> {
        self.cache.get(&(key as u8)).copied()
    }

    fn write_i32(&mut self, key: SettingsKey, value: i32) {
        let _ = self.cache.insert(key as u8, value);
        if FLASH_WRITES.try_send((key as u8, value)).is_err() {
            // The RAM cache already has the value; only durability lags.
            defmt::warn!("settings: flash write queue full, key {} not persisted", key as u8);
        }
    }
}

/// Drains the write-back queue into the flash map.
#[embassy_executor::task]
pub async fn flash_task(mut flash: Flash) {
    let mut buffer = [0u8; 32];
    loop {
        let (key, value) = FLASH_WRITES.receive().await;
        if let Err(e) = store_item(
            &mut flash,
            SETTINGS_FLASH_RANGE,
            &mut NoCache::new(),
            &mut buffer,
            &key,
            &value,
        )
        .await
        {
            defmt::warn!(
                "settings: flash write failed for key {}: {}",
                key,
                defmt::Debug2Format(&e)
            );
        }
    }
}
