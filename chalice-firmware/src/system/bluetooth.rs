//! Bluetooth module
//!
//! The companion app talks to one GATT service with a single writable
//! characteristic. Each write carries one settings record in the wire
//! form `chalice_core::settings::decode_record` understands.

// Core
use core::mem;

// BLE
use nrf_softdevice::{
    self,
    ble::advertisement_builder::{
        Flag, LegacyAdvertisementBuilder, LegacyAdvertisementPayload,
    },
    raw, Config,
};

pub static ADV_DATA: LegacyAdvertisementPayload = LegacyAdvertisementBuilder::new()
    .flags(&[Flag::GeneralDiscovery, Flag::LE_Only])
    .full_name("Chalice")
    .build();

pub static SCAN_DATA: LegacyAdvertisementPayload = LegacyAdvertisementBuilder::new().build();

#[nrf_softdevice::gatt_server]
pub struct Server {
    pub config: ConfigService,
}

/// Watchface configuration service
#[nrf_softdevice::gatt_service(uuid = "c5a11ce0-7a3d-44f2-9e30-8a2b64f72c01")]
pub struct ConfigService {
    /// One settings record per write, `(u8 key, i32 LE)` pairs
    #[characteristic(uuid = "c5a11ce1-7a3d-44f2-9e30-8a2b64f72c01", write)]
    pub record: heapless::Vec<u8, 20>,
}

pub fn softdevice_config() -> Config {
    Config {
        clock: Some(raw::nrf_clock_lf_cfg_t {
            source: raw::NRF_CLOCK_LF_SRC_XTAL as u8,
            rc_ctiv: 0,
            rc_temp_ctiv: 0,
            accuracy: raw::NRF_CLOCK_LF_ACCURACY_20_PPM as u8,
        }),
        conn_gap: Some(raw::ble_gap_conn_cfg_t {
            conn_count: 1,
            event_length: 24,
        }),
        // Matches the settings inbox budget; a record write is far smaller.
        conn_gatt: Some(raw::ble_gatt_conn_cfg_t {
            att_mtu: chalice_core::settings::INBOX_SIZE as u16,
        }),
        gatts_attr_tab_size: Some(raw::ble_gatts_cfg_attr_tab_size_t {
            attr_tab_size: raw::BLE_GATTS_ATTR_TAB_SIZE_DEFAULT,
        }),
        gap_role_count: Some(raw::ble_gap_cfg_role_count_t {
            adv_set_count: 1,
            periph_role_count: 1,
            central_role_count: 0,
            central_sec_count: 0,
            _bitfield_1: raw::ble_gap_cfg_role_count_t::new_bitfield_1(0),
        }),
        gap_device_name: Some(raw::ble_gap_cfg_device_name_t {
            p_value: b"Chalice" as *const u8 as _,
            current_len: 7,
            max_len: 7,
            write_perm: unsafe { mem::zeroed() },
            _bitfield_1: raw::ble_gap_cfg_device_name_t::new_bitfield_1(
                raw::BLE_GATTS_VLOC_STACK as u8,
            ),
        }),
        ..Default::default()
    }
}
