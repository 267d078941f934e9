//! End-to-end tests wiring a real panel against a real keeper over the
//! in-memory link.
//!
//! Both nodes run their genuine flows; only the peripherals are mocks. The
//! timers run accelerated under a paused tokio clock, so the multi-second
//! timelines complete instantly while keeping their tick arithmetic
//! intact.

use std::time::Duration;

use deadbolt_core::constants::CREDENTIAL_BASE_ADDR;
use deadbolt_hardware::{
    Key, MotorCommand,
    mock::{MockAlarm, MockDisplay, MockKeypad, MockMotor, MockSerialLink, MockStore},
};
use deadbolt_keeper::{Keeper, KeeperConfig, ServeOutcome};
use deadbolt_panel::{Panel, PanelConfig, SessionOutcome};
use deadbolt_timer::{TickRate, TimerConfig};

struct Rig {
    panel: Panel<MockKeypad, MockDisplay, MockSerialLink>,
    keeper: Keeper<MockStore, MockSerialLink, MockMotor, MockAlarm>,
    keys: deadbolt_hardware::mock::MockKeypadHandle,
    screen: deadbolt_hardware::mock::MockDisplayHandle,
    motor: deadbolt_hardware::mock::MockMotorHandle,
    siren: deadbolt_hardware::mock::MockAlarmHandle,
    cells: deadbolt_hardware::mock::MockStoreHandle,
}

fn build_rig() -> Rig {
    let timer = TimerConfig::accelerated(TickRate::default(), Duration::from_millis(1));

    let (keypad, keys) = MockKeypad::new();
    let (display, screen) = MockDisplay::new();
    let (panel_link, keeper_link) = MockSerialLink::pair();
    let (motor_dev, motor) = MockMotor::new();
    let (alarm_dev, siren) = MockAlarm::new();
    let (store, cells) = MockStore::new();

    Rig {
        panel: Panel::new(keypad, display, panel_link, PanelConfig { timer }),
        keeper: Keeper::new(
            store.with_settle(Duration::from_millis(1)),
            keeper_link,
            motor_dev,
            alarm_dev,
            KeeperConfig {
                timer,
                credential_addr: CREDENTIAL_BASE_ADDR,
            },
        ),
        keys,
        screen,
        motor,
        siren,
        cells,
    }
}

#[tokio::test(start_paused = true)]
async fn provision_verify_open_runs_the_door_timeline_once() {
    let mut rig = build_rig();

    let keys = rig.keys.clone();
    let script = tokio::spawn(async move {
        keys.send_entry(&[1, 2, 3, 4, 5]).await.unwrap();
        keys.send_entry(&[1, 2, 3, 4, 5]).await.unwrap();
        keys.send_key(Key::Plus).await.unwrap();
        keys.send_entry(&[1, 2, 3, 4, 5]).await.unwrap();
    });

    let mut keeper = rig.keeper;
    let keeper_task = tokio::spawn(async move {
        keeper.provision().await.unwrap();
        let outcome = keeper.serve_session().await.unwrap();
        (keeper, outcome)
    });

    rig.panel.provision().await.unwrap();
    let panel_outcome = rig.panel.serve_once().await.unwrap();
    let (keeper, keeper_outcome) = keeper_task.await.unwrap();
    script.await.unwrap();

    assert_eq!(panel_outcome, SessionOutcome::DoorOpened);
    assert_eq!(keeper_outcome, ServeOutcome::DoorOpened);

    // Credential landed at its store address.
    assert_eq!(rig.cells.range(CREDENTIAL_BASE_ADDR, 5), vec![1, 2, 3, 4, 5]);

    // Exactly one stop at 15K (door open), one reverse at 18K, one final
    // stop at 33K.
    assert_eq!(
        rig.motor.history(),
        vec![
            MotorCommand::Forward,
            MotorCommand::Stop,
            MotorCommand::Reverse,
            MotorCommand::Stop,
        ]
    );

    // Nothing left armed, counter back at zero, siren untouched.
    assert!(!keeper.timer().is_armed());
    assert_eq!(keeper.timer().counter().read(), 0);
    assert!(rig.siren.transitions().is_empty());
    assert_eq!(rig.screen.line(0), "Door is closing");
}

#[tokio::test(start_paused = true)]
async fn three_wrong_candidates_run_the_alarm_timeline() {
    let mut rig = build_rig();

    let keys = rig.keys.clone();
    let script = tokio::spawn(async move {
        keys.send_entry(&[5, 4, 3, 2, 1]).await.unwrap();
        keys.send_entry(&[5, 4, 3, 2, 1]).await.unwrap();
        keys.send_key(Key::Plus).await.unwrap();
        for _ in 0..3 {
            keys.send_entry(&[0, 0, 0, 0, 0]).await.unwrap();
        }
    });

    let mut keeper = rig.keeper;
    let keeper_task = tokio::spawn(async move {
        keeper.provision().await.unwrap();
        let outcome = keeper.serve_session().await.unwrap();
        (keeper, outcome)
    });

    rig.panel.provision().await.unwrap();
    let panel_outcome = rig.panel.serve_once().await.unwrap();
    let (keeper, keeper_outcome) = keeper_task.await.unwrap();
    script.await.unwrap();

    assert_eq!(panel_outcome, SessionOutcome::LockedOut);
    assert_eq!(keeper_outcome, ServeOutcome::LockedOut);

    // Siren came on once and went off at the terminal tick.
    assert_eq!(rig.siren.transitions(), vec![true, false]);
    assert!(!rig.siren.is_active());

    // The door never moved, nothing is left armed.
    assert!(rig.motor.history().is_empty());
    assert!(!keeper.timer().is_armed());
    assert_eq!(keeper.timer().counter().read(), 0);
}

#[tokio::test(start_paused = true)]
async fn grant_on_second_round_resets_the_deny_count() {
    let mut rig = build_rig();

    let keys = rig.keys.clone();
    let script = tokio::spawn(async move {
        keys.send_entry(&[9, 9, 9, 9, 9]).await.unwrap();
        keys.send_entry(&[9, 9, 9, 9, 9]).await.unwrap();
        keys.send_key(Key::Plus).await.unwrap();
        keys.send_entry(&[1, 1, 1, 1, 1]).await.unwrap();
        keys.send_entry(&[9, 9, 9, 9, 9]).await.unwrap();
    });

    let mut keeper = rig.keeper;
    let keeper_task = tokio::spawn(async move {
        keeper.provision().await.unwrap();
        let outcome = keeper.serve_session().await.unwrap();
        (keeper, outcome)
    });

    rig.panel.provision().await.unwrap();
    let panel_outcome = rig.panel.serve_once().await.unwrap();
    let (keeper, keeper_outcome) = keeper_task.await.unwrap();
    script.await.unwrap();

    assert_eq!(panel_outcome, SessionOutcome::DoorOpened);
    assert_eq!(keeper_outcome, ServeOutcome::DoorOpened);
    assert!(rig.siren.transitions().is_empty());
    assert!(!keeper.timer().is_armed());
}

#[tokio::test(start_paused = true)]
async fn change_passcode_persists_and_new_code_opens_the_door() {
    let mut rig = build_rig();

    let keys = rig.keys.clone();
    let script = tokio::spawn(async move {
        // Initial provisioning.
        keys.send_entry(&[1, 1, 1, 1, 1]).await.unwrap();
        keys.send_entry(&[1, 1, 1, 1, 1]).await.unwrap();
        // Session 1: change the passcode to 22222.
        keys.send_key(Key::Minus).await.unwrap();
        keys.send_entry(&[1, 1, 1, 1, 1]).await.unwrap();
        keys.send_entry(&[2, 2, 2, 2, 2]).await.unwrap();
        keys.send_entry(&[2, 2, 2, 2, 2]).await.unwrap();
        // Session 2: the new code opens the door.
        keys.send_key(Key::Plus).await.unwrap();
        keys.send_entry(&[2, 2, 2, 2, 2]).await.unwrap();
    });

    let mut keeper = rig.keeper;
    let keeper_task = tokio::spawn(async move {
        keeper.provision().await.unwrap();
        let first = keeper.serve_session().await.unwrap();
        let second = keeper.serve_session().await.unwrap();
        (first, second)
    });

    rig.panel.provision().await.unwrap();
    let first = rig.panel.serve_once().await.unwrap();
    let second = rig.panel.serve_once().await.unwrap();
    let (keeper_first, keeper_second) = keeper_task.await.unwrap();
    script.await.unwrap();

    assert_eq!(first, SessionOutcome::PasscodeChanged);
    assert_eq!(second, SessionOutcome::DoorOpened);
    assert_eq!(keeper_first, ServeOutcome::PasscodeChanged);
    assert_eq!(keeper_second, ServeOutcome::DoorOpened);

    // The replacement is the authoritative copy now.
    assert_eq!(rig.cells.range(CREDENTIAL_BASE_ADDR, 5), vec![2, 2, 2, 2, 2]);
    assert_eq!(rig.motor.count_of(MotorCommand::Forward), 1);
}
