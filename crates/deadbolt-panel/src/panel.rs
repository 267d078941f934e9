//! The panel node flow.
//!
//! The panel owns one keypad, one display, one serial link, and one timer.
//! After provisioning the initial passcode it serves operator sessions in
//! a loop: show the options menu, collect a verification entry, transfer
//! it, and act on the keeper's verdict. Waiting out a timeline (the door
//! travel after an `OpenDoor` grant, or the lockout after three denies) is
//! a blocking busy-poll of the tick counter; the panel does nothing else
//! meanwhile, while the display keeps being updated from the timer
//! interrupt path.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use deadbolt_core::{PanelAction, Passcode, constants::MAX_VERIFY_ROUNDS};
use deadbolt_hardware::{Display, Key, Keypad, SerialLink};
use deadbolt_protocol as protocol;
use deadbolt_timer::{AlarmSchedule, DoorEvent, DoorSchedule, TickTimer, TimerConfig};

use crate::{
    entry::{self, ExactEntry},
    error::PanelError,
    lifecycle::ProvisionMachine,
};

const PROMPT_FIRST: &str = "Enter N_Password";
const PROMPT_CONFIRM: &str = "RE-Enter N_Pass";
const PROMPT_VERIFY: &str = "Enter Password:";
const MENU_OPEN: &str = "+: open door";
const MENU_CHANGE: &str = "-:change pass";
const MSG_DOOR_OPENING: &str = "Door is opening";
const MSG_DOOR_STOPPED: &str = "Door is stop";
const MSG_DOOR_CLOSING: &str = "Door is closing";
const MSG_LOCKOUT: &str = "Error";

/// Panel configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelConfig {
    /// Timer configuration; its rate fixes every timeline mark.
    pub timer: TimerConfig,
}

impl Default for PanelConfig {
    fn default() -> Self {
        PanelConfig {
            timer: TimerConfig::default(),
        }
    }
}

/// How one operator session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionOutcome {
    /// Verification granted, door timeline ran to completion.
    DoorOpened,
    /// Verification granted, replacement passcode provisioned.
    PasscodeChanged,
    /// Three consecutive denies; the lockout timeline ran to completion.
    LockedOut,
}

/// The front panel node.
pub struct Panel<K, D, L> {
    keypad: K,
    display: Arc<D>,
    link: L,
    timer: TickTimer,
    config: PanelConfig,
    door: DoorSchedule,
    alarm: AlarmSchedule,
}

impl<K, D, L> Panel<K, D, L>
where
    K: Keypad,
    D: Display + 'static,
    L: SerialLink,
{
    /// Wire a panel from its peripherals.
    pub fn new(keypad: K, display: D, link: L, config: PanelConfig) -> Self {
        let rate = config.timer.rate;
        Panel {
            keypad,
            display: Arc::new(display),
            link,
            timer: TickTimer::new(),
            config,
            door: DoorSchedule::new(rate),
            alarm: AlarmSchedule::new(rate),
        }
    }

    /// Run the full node flow: provision once, then serve sessions
    /// forever.
    ///
    /// # Errors
    /// Returns an error if a peripheral or the link fails; protocol stalls
    /// block forever by design.
    pub async fn run(&mut self) -> Result<(), PanelError> {
        self.provision().await?;
        loop {
            self.serve_once().await?;
        }
    }

    /// Run the provisioning lifecycle and transfer the confirmed passcode
    /// to the keeper.
    ///
    /// # Errors
    /// Returns an error if a peripheral or the link fails.
    pub async fn provision(&mut self) -> Result<(), PanelError> {
        let code = self.set_passcode().await?;
        protocol::send_passcode(&mut self.link, &code).await?;
        info!("passcode provisioned");
        Ok(())
    }

    /// Serve one operator session: options menu, bounded verification
    /// rounds, and the follow-up timeline.
    ///
    /// # Errors
    /// Returns an error if a peripheral or the link fails.
    pub async fn serve_once(&mut self) -> Result<SessionOutcome, PanelError> {
        let action = self.show_options().await?;
        debug!(%action, "option selected");

        for round in 0..MAX_VERIFY_ROUNDS {
            let entry =
                entry::read_bounded_entry(&mut self.keypad, self.display.as_ref(), PROMPT_VERIFY)
                    .await?;
            protocol::send_candidate(&mut self.link, &entry.candidate()).await?;

            let verdict = protocol::recv_verdict(&mut self.link).await?;
            if verdict.is_match() {
                protocol::send_action(&mut self.link, action).await?;
                return match action {
                    PanelAction::ChangePasscode => {
                        self.provision().await?;
                        Ok(SessionOutcome::PasscodeChanged)
                    }
                    PanelAction::OpenDoor => {
                        self.door_wait().await;
                        Ok(SessionOutcome::DoorOpened)
                    }
                };
            }
            warn!(round, "verification denied");
        }

        self.lockout_wait().await;
        Ok(SessionOutcome::LockedOut)
    }

    /// Drive the lifecycle until a passcode is confirmed.
    async fn set_passcode(&mut self) -> Result<Passcode, PanelError> {
        let mut machine = ProvisionMachine::new();
        loop {
            let first = loop {
                let outcome = entry::read_exact_entry(
                    &mut self.keypad,
                    self.display.as_ref(),
                    PROMPT_FIRST,
                )
                .await?;
                match outcome {
                    ExactEntry::Accepted(code) => break code,
                    ExactEntry::FormatError => {
                        debug!("format error, restarting first entry");
                    }
                }
            };
            machine.accept_first(first)?;

            let confirmation = entry::read_bounded_entry(
                &mut self.keypad,
                self.display.as_ref(),
                PROMPT_CONFIRM,
            )
            .await?;
            if let Some(code) = machine.confirm(&confirmation)? {
                return Ok(code);
            }
            debug!("confirmation mismatch, restarting lifecycle");
        }
    }

    /// Show the options menu and block until the operator picks one.
    async fn show_options(&mut self) -> Result<PanelAction, PanelError> {
        loop {
            self.display.clear();
            self.display.print_str(MENU_OPEN);
            self.display.move_cursor(1, 0);
            self.display.print_str(MENU_CHANGE);

            match self.keypad.read_key().await? {
                Key::Plus => return Ok(PanelAction::OpenDoor),
                Key::Minus => return Ok(PanelAction::ChangePasscode),
                _ => {}
            }
        }
    }

    /// Wait out the door timeline, narrating its phases on the display.
    ///
    /// The phase messages are written from the timer callback (interrupt
    /// context) while this method busy-polls the tick counter; once the
    /// finish tick is reached it disarms the timer and resets the counter.
    async fn door_wait(&mut self) {
        let display = Arc::clone(&self.display);
        let schedule = self.door;
        self.timer.set_callback(move |tick| match schedule.event_at(tick) {
            Some(DoorEvent::Stop) => {
                display.clear();
                display.print_str(MSG_DOOR_STOPPED);
            }
            Some(DoorEvent::Reverse) => {
                display.clear();
                display.print_str(MSG_DOOR_CLOSING);
            }
            Some(DoorEvent::Finish) | None => {}
        });

        self.display.clear();
        self.display.print_str(MSG_DOOR_OPENING);
        self.timer.arm(self.config.timer);

        self.timer.wait_for_tick(self.door.finish_tick()).await;
        self.timer.disarm().await;
        self.timer.counter().reset();
        self.timer.clear_callback();
        info!("door timeline complete");
    }

    /// Wait out the lockout period with the error message up.
    async fn lockout_wait(&mut self) {
        self.display.clear();
        self.display.print_str(MSG_LOCKOUT);
        self.timer.arm(self.config.timer);

        self.timer.wait_for_tick(self.alarm.finish_tick()).await;
        self.timer.disarm().await;
        self.timer.counter().reset();
        self.display.clear();
        warn!("lockout period served");
    }
}
