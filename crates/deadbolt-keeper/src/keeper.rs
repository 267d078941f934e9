//! The keeper node flow.
//!
//! One store, one serial link, one motor, one siren, one timer. The keeper
//! persists the provisioned passcode, then serves verification sessions
//! until the node is powered off. Actuator transitions during a timeline
//! (motor stop at 15·K, reverse at 18·K, siren off at 60·K) happen in the
//! timer callback (interrupt context) while the session flow busy-polls
//! the tick counter for the terminal tick, then disarms the timer and
//! resets the counter.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use deadbolt_core::{PanelAction, Verdict, constants::CREDENTIAL_BASE_ADDR};
use deadbolt_hardware::{AlarmSiren, MotorCommand, MotorDrive, PersistentStore, SerialLink};
use deadbolt_protocol as protocol;
use deadbolt_timer::{AlarmSchedule, DoorEvent, DoorSchedule, TickTimer, TimerConfig};

use crate::{error::KeeperError, vault::CredentialVault, verify::LockoutTracker};

/// Keeper configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeeperConfig {
    /// Timer configuration; its rate fixes every timeline mark.
    pub timer: TimerConfig,
    /// Base address of the credential in the persistent store.
    pub credential_addr: u16,
}

impl Default for KeeperConfig {
    fn default() -> Self {
        KeeperConfig {
            timer: TimerConfig::default(),
            credential_addr: CREDENTIAL_BASE_ADDR,
        }
    }
}

/// How one verification session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServeOutcome {
    /// A grant followed by `OpenDoor`; the door timeline ran to
    /// completion.
    DoorOpened,
    /// A grant followed by `ChangePasscode`; the replacement is persisted.
    PasscodeChanged,
    /// Three consecutive denies; the alarm timeline ran to completion.
    LockedOut,
}

/// The secure keeper node.
pub struct Keeper<S, L, M, A> {
    vault: CredentialVault<S>,
    link: L,
    motor: Arc<M>,
    siren: Arc<A>,
    timer: TickTimer,
    config: KeeperConfig,
    door: DoorSchedule,
    alarm: AlarmSchedule,
}

impl<S, L, M, A> Keeper<S, L, M, A>
where
    S: PersistentStore,
    L: SerialLink,
    M: MotorDrive + 'static,
    A: AlarmSiren + 'static,
{
    /// Wire a keeper from its peripherals.
    pub fn new(store: S, link: L, motor: M, siren: A, config: KeeperConfig) -> Self {
        let rate = config.timer.rate;
        Keeper {
            vault: CredentialVault::with_base_addr(store, config.credential_addr),
            link,
            motor: Arc::new(motor),
            siren: Arc::new(siren),
            timer: TickTimer::new(),
            config,
            door: DoorSchedule::new(rate),
            alarm: AlarmSchedule::new(rate),
        }
    }

    /// The node's timer, exposed so tests can assert nothing is left
    /// armed after a timeline.
    #[must_use]
    pub fn timer(&self) -> &TickTimer {
        &self.timer
    }

    /// Run the full node flow: accept the initial passcode, then serve
    /// sessions forever.
    ///
    /// # Errors
    /// Returns an error if a peripheral or the link fails; protocol stalls
    /// block forever by design.
    pub async fn run(&mut self) -> Result<(), KeeperError> {
        self.provision().await?;
        loop {
            self.serve_session().await?;
        }
    }

    /// Receive a passcode over the handshake and persist it.
    ///
    /// # Errors
    /// Returns an error if the link or the store fails.
    pub async fn provision(&mut self) -> Result<(), KeeperError> {
        let code = protocol::recv_passcode(&mut self.link).await?;
        self.vault.persist(&code).await?;
        info!("passcode persisted");
        Ok(())
    }

    /// Serve one verification session: bounded rounds until a grant or
    /// lockout.
    ///
    /// # Errors
    /// Returns an error if a peripheral or the link fails.
    pub async fn serve_session(&mut self) -> Result<ServeOutcome, KeeperError> {
        let mut tracker = LockoutTracker::new();
        loop {
            let candidate = protocol::recv_candidate(&mut self.link).await?;
            let verdict = if self.vault.matches(&candidate).await? {
                Verdict::Match
            } else {
                Verdict::NoMatch
            };
            tracker.record(verdict);
            protocol::send_verdict(&mut self.link, verdict).await?;

            if verdict.is_match() {
                let action = protocol::recv_action(&mut self.link).await?;
                debug!(%action, "grant follow-up");
                return match action {
                    PanelAction::ChangePasscode => {
                        self.provision().await?;
                        Ok(ServeOutcome::PasscodeChanged)
                    }
                    PanelAction::OpenDoor => {
                        self.open_door().await;
                        Ok(ServeOutcome::DoorOpened)
                    }
                };
            }

            warn!(denies = tracker.denies(), "candidate denied");
            if tracker.lockout_reached() {
                self.sound_alarm().await;
                return Ok(ServeOutcome::LockedOut);
            }
        }
    }

    /// Run the door timeline: motor forward now, stop at 15·K, reverse at
    /// 18·K, stop again at 33·K, then disarm and reset.
    async fn open_door(&mut self) {
        let motor = Arc::clone(&self.motor);
        let schedule = self.door;
        self.timer.set_callback(move |tick| match schedule.event_at(tick) {
            Some(DoorEvent::Stop) | Some(DoorEvent::Finish) => motor.rotate(MotorCommand::Stop),
            Some(DoorEvent::Reverse) => motor.rotate(MotorCommand::Reverse),
            None => {}
        });

        self.motor.rotate(MotorCommand::Forward);
        self.timer.arm(self.config.timer);

        self.timer.wait_for_tick(self.door.finish_tick()).await;
        self.timer.disarm().await;
        self.timer.counter().reset();
        self.timer.clear_callback();
        info!("door timeline complete");
    }

    /// Run the alarm timeline: siren on now, off at 60·K, then disarm and
    /// reset.
    async fn sound_alarm(&mut self) {
        let siren = Arc::clone(&self.siren);
        let schedule = self.alarm;
        self.timer.set_callback(move |tick| {
            if schedule.is_finish(tick) {
                siren.set_active(false);
            }
        });

        self.siren.set_active(true);
        self.timer.arm(self.config.timer);

        self.timer.wait_for_tick(self.alarm.finish_tick()).await;
        self.timer.disarm().await;
        self.timer.counter().reset();
        self.timer.clear_callback();
        warn!("alarm timeline complete");
    }
}
