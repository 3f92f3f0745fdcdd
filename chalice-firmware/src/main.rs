#![no_std]
#![no_main]

mod peripherals;
mod system;

// Panic handler and debugging
use defmt::unwrap;

use defmt_rtt as _;
use panic_probe as _;

// Device
use embassy_executor::Spawner;
use embassy_nrf::{
    bind_interrupts,
    gpio::{Level, Output, OutputDrive},
    peripherals::SPI2,
    spim,
};
use embassy_sync::{blocking_mutex::raw::ThreadModeRawMutex, channel::Channel, signal::Signal};
use embassy_time::{Duration, Instant, Ticker, Timer};
use nrf_softdevice::ble::{gatt_server, peripheral};
use nrf_softdevice::Softdevice;

bind_interrupts!(struct Irqs {
    SPIM2_SPIS2_SPI2 => spim::InterruptHandler<SPI2>;
});

// Crate
use peripherals::{
    display::{BacklightPins, Display, LCD_H, LCD_W},
    vibrator::{PulseLength, Vibrator},
};
use system::{
    bluetooth::{softdevice_config, ConfigServiceEvent, Server, ServerEvent, ADV_DATA, SCAN_DATA},
    config::SystemConfig,
    store::{flash_task, FlashSettings},
};

// Watchface logic
use chalice_core::{
    clock::ClockReading,
    connectivity::{ConnectivityMonitor, HapticRequest},
    face::{ColorSupport, DisplayShape, HandStyle, Watchface},
    settings::{decode_record, DropReason, Record, SettingsKey, SettingsStore},
};

// Others
use chrono::{NaiveDateTime, Timelike};
use embedded_graphics::geometry::Size;
use rand_xoshiro::{rand_core::SeedableRng, Xoroshiro128StarStar};

// Include current UTC epoch at compile time
include!(concat!(env!("OUT_DIR"), "/utc.rs"));
const TIMEZONE: i64 = 1 * 3_600;

// Communication channels
static TIME: Signal<ThreadModeRawMutex, NaiveDateTime> = Signal::new();
static CONNECTED: Signal<ThreadModeRawMutex, bool> = Signal::new();
static HAPTICS: Signal<ThreadModeRawMutex, HapticRequest> = Signal::new();
static SETTINGS_CHANGED: Signal<ThreadModeRawMutex, ()> = Signal::new();
static DROPPED: Signal<ThreadModeRawMutex, DropReason> = Signal::new();
static INBOX: Channel<ThreadModeRawMutex, Record, 4> = Channel::new();

/// Settings-changed callback registered with the store.
fn settings_changed() {
    SETTINGS_CHANGED.signal(());
}

/// Signal the wall clock once per minute, on the minute.
#[embassy_executor::task(pool_size = 1)]
async fn update_time() {
    loop {
        let now = Instant::now();
        let time = unwrap!(chrono::DateTime::from_timestamp(
            UTC_EPOCH + TIMEZONE + now.as_secs() as i64,
            0
        ))
        .naive_utc();
        TIME.signal(time);

        // Sleep to the next minute boundary
        Timer::after(Duration::from_secs(60 - time.second() as u64)).await;
    }
}

/// Pulse the motor whenever the face asks for it.
#[embassy_executor::task(pool_size = 1)]
async fn run_haptics(mut vibrator: Vibrator) {
    loop {
        match HAPTICS.wait().await {
            HapticRequest::DoublePulse => vibrator.pulse(PulseLength::Short, Some(2)).await,
        }
    }
}

#[embassy_executor::task(pool_size = 1)]
async fn softdevice_task(sd: &'static Softdevice) -> ! {
    sd.run().await
}

/// Advertise, serve one central at a time, and feed record writes and
/// connectivity transitions to the rest of the app.
#[embassy_executor::task(pool_size = 1)]
async fn bluetooth_task(sd: &'static Softdevice, server: Server) {
    loop {
        let config = peripheral::Config::default();
        let adv = peripheral::ConnectableAdvertisement::ScannableUndirected {
            adv_data: &ADV_DATA,
            scan_data: &SCAN_DATA,
        };
        let conn = unwrap!(peripheral::advertise_connectable(sd, adv, &config).await);
        defmt::info!("phone connected");
        CONNECTED.signal(true);

        gatt_server::run(&conn, &server, |e| match e {
            ServerEvent::Config(ConfigServiceEvent::RecordWrite(data)) => {
                match decode_record(&data) {
                    Some(record) => {
                        if INBOX.try_send(record).is_err() {
                            DROPPED.signal(DropReason::BufferFull);
                        }
                    }
                    None => DROPPED.signal(DropReason::Malformed),
                }
            }
        })
        .await;

        defmt::info!("phone disconnected");
        CONNECTED.signal(false);
    }
}

/// Owns the LCD, the face and the settings store. Every event that can
/// change pixels funnels through here, one at a time.
#[embassy_executor::task(pool_size = 1)]
async fn update_lcd(
    mut display: Display<SPI2>,
    mut face: Watchface,
    mut store: SettingsStore<FlashSettings, fn()>,
    mut monitor: ConnectivityMonitor,
    mut rng: Xoroshiro128StarStar,
) {
    // First wall-clock reading before the first paint
    let mut time = TIME.wait().await;

    let mut tick = Ticker::every(Duration::from_millis(250));
    loop {
        while let Ok(record) = INBOX.try_receive() {
            store.on_message(&record);
        }

        if DROPPED.signaled() {
            let reason = DROPPED.wait().await;
            store.on_dropped(reason);
        }

        if SETTINGS_CHANGED.signaled() {
            SETTINGS_CHANGED.wait().await;
            defmt::info!("settings changed, recomputing appearance");
            face.apply_style(HandStyle::from_i32(store.get_i32(SettingsKey::Style)));
            face.apply_colors(store.get_color(SettingsKey::FaceColor), &mut rng);
        }

        if CONNECTED.signaled() {
            let connected = CONNECTED.wait().await;
            if let Some(request) = monitor.update(connected) {
                HAPTICS.signal(request);
            }
            face.set_connected(connected);
        }

        if TIME.signaled() {
            time = TIME.wait().await;
            face.handle_tick();
        }

        display.repaint(&mut face, &ClockReading::from_datetime(time));
        tick.next().await;
    }
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_nrf::init(SystemConfig::new());
    defmt::info!("Initializing");

    // Initialize SPI
    let mut spim_config = spim::Config::default();
    // Use SPI at 8MHz (the fastest clock available on the nRF52832),
    // otherwise refreshing will be super slow.
    spim_config.frequency = spim::Frequency::M8;
    // SPI must be used in mode 3. Mode 0 (the default) won't work.
    spim_config.mode = spim::MODE_3;

    let spim = spim::Spim::new(p.SPI2, Irqs, p.P0_02, p.P0_04, p.P0_03, spim_config);

    // Initialize LCD
    let backlight = BacklightPins::init(
        Output::new(p.P0_14, Level::High, OutputDrive::Standard),
        Output::new(p.P0_22, Level::High, OutputDrive::Standard),
        Output::new(p.P0_23, Level::High, OutputDrive::Standard),
    );
    let display = Display::init(
        spim,
        Output::new(p.P0_25, Level::Low, OutputDrive::Standard),
        Output::new(p.P0_18, Level::Low, OutputDrive::Standard),
        Output::new(p.P0_26, Level::Low, OutputDrive::Standard),
        backlight,
    );

    // Initialize vibration motor
    let vibrator = Vibrator::init(Output::new(p.P0_16, Level::High, OutputDrive::Standard));

    // Initialize Bluetooth; the SoftDevice also provides flash and entropy
    let sd = Softdevice::enable(&softdevice_config());
    let server = unwrap!(Server::new(sd));
    let sd: &'static Softdevice = sd;

    // Seed the accent-color generator once per boot
    let mut seed = [0u8; 16];
    unwrap!(nrf_softdevice::random_bytes(sd, &mut seed));
    let mut rng = Xoroshiro128StarStar::from_seed(seed);

    // Settings store over the flash-backed key/value map
    let mut flash = nrf_softdevice::Flash::take(sd);
    let backend = FlashSettings::load(&mut flash).await;
    let mut store = SettingsStore::new(backend);
    store.init(settings_changed as fn());

    // Build the face from whatever settings survived the last boot
    let mut face = Watchface::new(
        Size::new(LCD_W as u32, LCD_H as u32),
        DisplayShape::Rect,
        ColorSupport::Full,
    );
    face.apply_style(HandStyle::from_i32(store.get_i32(SettingsKey::Style)));
    face.apply_colors(store.get_color(SettingsKey::FaceColor), &mut rng);

    // Not connected until a central shows up; the startup read never pulses
    let monitor = ConnectivityMonitor::new(false);

    defmt::info!("Initialization finished");

    // Schedule tasks
    unwrap!(spawner.spawn(softdevice_task(sd)));
    unwrap!(spawner.spawn(bluetooth_task(sd, server)));
    unwrap!(spawner.spawn(flash_task(flash)));
    unwrap!(spawner.spawn(update_time()));
    unwrap!(spawner.spawn(run_haptics(vibrator)));
    unwrap!(spawner.spawn(update_lcd(display, face, store, monitor, rng)));
}
