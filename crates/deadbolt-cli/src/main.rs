//! Demo driver: runs both Deadbolt nodes over an in-memory link.
//!
//! Wires a panel and a keeper to mock peripherals, scripts an operator
//! session (provision `12345`, verify it, open the door), and logs what
//! the hardware did. The timer runs accelerated so the 33-second door
//! timeline completes in about a second of wall time.
//!
//! Run with `RUST_LOG=debug` to watch the protocol exchange.

use std::time::Duration;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use deadbolt_core::constants::{CREDENTIAL_BASE_ADDR, PASS_SIZE};
use deadbolt_hardware::{
    Key,
    mock::{MockAlarm, MockDisplay, MockKeypad, MockMotor, MockSerialLink, MockStore},
};
use deadbolt_keeper::{Keeper, KeeperConfig};
use deadbolt_panel::{Panel, PanelConfig};
use deadbolt_timer::{TickRate, TimerConfig};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Accelerated clock: same tick arithmetic, 1ms per tick.
    let timer = TimerConfig::accelerated(TickRate::default(), Duration::from_millis(1));

    let (keypad, keys) = MockKeypad::new();
    let (display, screen) = MockDisplay::new();
    let (panel_link, keeper_link) = MockSerialLink::pair();
    let (motor_dev, motor) = MockMotor::new();
    let (alarm_dev, siren) = MockAlarm::new();
    let (store, cells) = MockStore::new();

    let mut keeper = Keeper::new(
        store.with_settle(Duration::from_millis(1)),
        keeper_link,
        motor_dev,
        alarm_dev,
        KeeperConfig {
            timer,
            ..Default::default()
        },
    );
    let keeper_task = tokio::spawn(async move { keeper.run().await });

    // Scripted operator: set 12345, confirm it, pick "+", verify.
    keys.send_entry(&[1, 2, 3, 4, 5]).await?;
    keys.send_entry(&[1, 2, 3, 4, 5]).await?;
    keys.send_key(Key::Plus).await?;
    keys.send_entry(&[1, 2, 3, 4, 5]).await?;

    let mut panel = Panel::new(keypad, display, panel_link, PanelConfig { timer });
    panel.provision().await?;
    info!("credential provisioned and persisted");

    let outcome = panel.serve_once().await?;
    info!(?outcome, "session complete");

    info!(stored = ?cells.range(CREDENTIAL_BASE_ADDR, PASS_SIZE), "keeper store");
    info!(commands = ?motor.history(), "motor command log");
    info!(alarm = ?siren.transitions(), "siren transitions");
    info!(display = %screen.line(0), "panel display");

    keeper_task.abort();
    Ok(())
}
