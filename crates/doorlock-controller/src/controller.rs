//! Door controller state machine.
//!
//! The controller owns the lock state and every peripheral. Each cycle it
//! samples the button, then the card reader, then the serial link, stopping
//! at the first input that qualifies, and runs the sequence that moves the
//! latch to the opposite state.
//!
//! # States
//!
//! - `Unlocked` → lock sequence → `Locked`
//! - `Locked` → unlock sequence → `Unlocked`
//!
//! A sequence runs to completion before the next input is sampled. Inputs
//! that arrive while the motor turns are seen on a later cycle, if they are
//! still there.
//!
//! # Examples
//!
//! ```
//! use doorlock_controller::{DoorController, Peripherals, Trigger};
//! use doorlock_core::{DoorConfig, LockState};
//! use doorlock_hardware::mock::{MockButton, MockNotifier, MockRfid, MockSerial, MockStepper};
//!
//! #[tokio::main]
//! async fn main() -> doorlock_controller::Result<()> {
//!     let (button, button_handle) = MockButton::new();
//!     let (reader, _rfid_handle) = MockRfid::new();
//!     let (serial, _serial_handle) = MockSerial::new();
//!
//!     let mut controller = DoorController::new(
//!         &DoorConfig::default(),
//!         Peripherals {
//!             button,
//!             reader,
//!             motor: MockStepper::new(),
//!             notifier: MockNotifier::new(),
//!             serial,
//!         },
//!     )?;
//!     controller.start().await?;
//!
//!     button_handle.press().await?;
//!     let transition = controller.run_cycle().await?.unwrap();
//!
//!     assert_eq!(transition.trigger, Trigger::Button);
//!     assert_eq!(controller.state(), LockState::Locked);
//!     Ok(())
//! }
//! ```

use std::collections::VecDeque;
use std::time::Duration;

use doorlock_core::{BluetoothToken, CredentialStore, DoorConfig, LockState};
use doorlock_hardware::{
    ButtonDevice, CardReader, Cue, NotificationSink, SerialLink, StepperConfig, StepperMotor,
};
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::bluetooth::{TokenCheck, check_token};
use crate::card::scan_card;
use crate::transition::{LockTransition, MAX_HISTORY_SIZE, Trigger};
use crate::{ControllerError, Result};

/// The devices a controller drives.
#[derive(Debug)]
pub struct Peripherals<B, R, M, N, S> {
    pub button: B,
    pub reader: R,
    pub motor: M,
    pub notifier: N,
    pub serial: S,
}

/// Access-control state machine for one motorized lock.
///
/// Not thread-safe by itself. Hosts that need to reach it from several tasks
/// must hold it behind a `tokio::sync::Mutex` so that a transition stays
/// mutually exclusive with input sampling.
pub struct DoorController<B, R, M, N, S> {
    state: LockState,
    store: CredentialStore,
    token: BluetoothToken,

    stepper: StepperConfig,
    speed_rpm: u32,
    steps_to_throw: i32,
    settle_delay: Duration,
    poll_interval: Duration,
    max_line_len: usize,

    devices: Peripherals<B, R, M, N, S>,

    /// Completed transitions, oldest first (limited to MAX_HISTORY_SIZE).
    history: VecDeque<LockTransition>,
}

impl<B, R, M, N, S> DoorController<B, R, M, N, S>
where
    B: ButtonDevice,
    R: CardReader,
    M: StepperMotor,
    N: NotificationSink,
    S: SerialLink,
{
    /// Build a controller from a configuration and its devices.
    ///
    /// The controller starts `Unlocked`. Call [`start`](Self::start) before
    /// the first cycle.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration does not validate.
    pub fn new(config: &DoorConfig, devices: Peripherals<B, R, M, N, S>) -> Result<Self> {
        config.validate()?;

        let stepper = StepperConfig::new(config.motor.steps_per_revolution, config.motor.coil_pins)?;
        let steps_to_throw = i32::try_from(config.motor.steps_to_throw).map_err(|_| {
            doorlock_core::Error::Config("steps_to_throw out of range".to_string())
        })?;

        Ok(Self {
            state: LockState::default(),
            store: config.credential_store()?,
            token: config.bluetooth_token()?,
            stepper,
            speed_rpm: config.motor.speed_rpm,
            steps_to_throw,
            settle_delay: config.settle_delay(),
            poll_interval: config.poll_interval(),
            max_line_len: config.max_line_len(),
            devices,
            history: VecDeque::with_capacity(MAX_HISTORY_SIZE),
        })
    }

    /// Bring the hardware to its power-on state.
    ///
    /// Configures the stepper, lights the indicator for the unlocked door,
    /// plays the unlock cue and leaves the coils released.
    ///
    /// # Errors
    ///
    /// Returns an error if the stepper rejects its configuration or the
    /// coils cannot be released.
    pub async fn start(&mut self) -> Result<()> {
        let motor = &mut self.devices.motor;
        motor.configure(&self.stepper).await?;
        motor.set_speed(self.speed_rpm).await?;
        motor.release_coils().await?;

        self.indicate(true).await;
        self.notify(Cue::UnlockComplete).await;

        info!(
            state = %self.state,
            keys = self.store.len(),
            steps_to_throw = self.steps_to_throw,
            "Door controller started"
        );
        Ok(())
    }

    pub fn state(&self) -> LockState {
        self.state
    }

    pub fn credentials(&self) -> &CredentialStore {
        &self.store
    }

    pub fn devices(&self) -> &Peripherals<B, R, M, N, S> {
        &self.devices
    }

    pub fn devices_mut(&mut self) -> &mut Peripherals<B, R, M, N, S> {
        &mut self.devices
    }

    /// Completed transitions, ordered from oldest to newest.
    pub fn history(&self) -> &VecDeque<LockTransition> {
        &self.history
    }

    /// The last `count` transitions, oldest first.
    pub fn last_transitions(&self, count: usize) -> Vec<LockTransition> {
        let skip = self.history.len().saturating_sub(count);
        self.history.iter().skip(skip).cloned().collect()
    }

    /// Sample the inputs in priority order and return the first that
    /// qualifies.
    ///
    /// Channels after the winning one are not touched: a card waiting behind
    /// a pressed button is neither read nor released, and serial bytes stay
    /// buffered.
    pub async fn poll_inputs(&mut self) -> Option<Trigger> {
        if self.button_pressed().await {
            return Some(Trigger::Button);
        }

        if scan_card(&mut self.devices.reader, &self.store)
            .await
            .is_granted()
        {
            return Some(Trigger::Card);
        }

        let check = check_token(
            &mut self.devices.serial,
            &self.token,
            self.state,
            self.max_line_len,
        )
        .await;
        if check == TokenCheck::Accepted {
            return Some(Trigger::Bluetooth);
        }

        None
    }

    /// Move the latch to the state opposite the current one.
    ///
    /// The trigger is recorded but not re-checked.
    ///
    /// # Errors
    ///
    /// Returns [`ControllerError::Actuator`] if the motor fails mid-move.
    /// The coils are released and the lock state is unchanged.
    pub async fn transition(&mut self, trigger: Trigger) -> Result<LockTransition> {
        let target = self.state.toggled();
        self.run_sequence(target, trigger).await
    }

    /// Run the lock sequence regardless of the current state.
    ///
    /// # Errors
    ///
    /// See [`transition`](Self::transition).
    pub async fn lock(&mut self) -> Result<LockTransition> {
        self.run_sequence(LockState::Locked, Trigger::Direct).await
    }

    /// Run the unlock sequence regardless of the current state.
    ///
    /// # Errors
    ///
    /// See [`transition`](Self::transition).
    pub async fn unlock(&mut self) -> Result<LockTransition> {
        self.run_sequence(LockState::Unlocked, Trigger::Direct).await
    }

    /// One control cycle: sample the inputs and transition on a trigger.
    ///
    /// # Errors
    ///
    /// Returns the error of a failed transition.
    pub async fn run_cycle(&mut self) -> Result<Option<LockTransition>> {
        match self.poll_inputs().await {
            Some(trigger) => self.transition(trigger).await.map(Some),
            None => Ok(None),
        }
    }

    /// Run cycles until `shutdown` reads `true` or its sender is dropped.
    ///
    /// Shutdown is checked between cycles only, so a sequence that has begun
    /// always completes. Failed transitions are logged and the loop goes on.
    ///
    /// # Errors
    ///
    /// Returns an error only if [`start`](Self::start) fails.
    pub async fn run(&mut self, mut shutdown: watch::Receiver<bool>) -> Result<()> {
        self.start().await?;

        loop {
            if *shutdown.borrow_and_update() {
                break;
            }

            match self.run_cycle().await {
                Ok(Some(transition)) => debug!(%transition, "Cycle complete"),
                Ok(None) => {}
                Err(e) => error!(error = %e, state = %self.state, "Transition failed"),
            }

            tokio::select! {
                _ = tokio::time::sleep(self.poll_interval) => {}
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }

        info!(state = %self.state, transitions = self.history.len(), "Door controller stopped");
        Ok(())
    }

    async fn run_sequence(&mut self, target: LockState, trigger: Trigger) -> Result<LockTransition> {
        let from = self.state;
        let (steps, cue) = match target {
            LockState::Locked => (self.steps_to_throw, Cue::LockComplete),
            LockState::Unlocked => (-self.steps_to_throw, Cue::UnlockComplete),
        };

        debug!(%from, to = %target, %trigger, steps, "Starting transition");

        self.notify(Cue::Acknowledge).await;
        if !self.settle_delay.is_zero() {
            tokio::time::sleep(self.settle_delay).await;
        }

        if let Err(source) = self.devices.motor.rotate(steps).await {
            if let Err(e) = self.devices.motor.release_coils().await {
                error!(error = %e, "Failed to release coils after aborted move");
            }
            return Err(ControllerError::Actuator { target, source });
        }

        self.notify(cue).await;
        self.indicate(!target.is_locked()).await;
        self.state = target;

        let transition = LockTransition::new(from, target, trigger);
        if self.history.len() >= MAX_HISTORY_SIZE {
            self.history.pop_front();
        }
        self.history.push_back(transition.clone());

        self.devices.motor.release_coils().await?;

        info!(%from, to = %target, %trigger, "Transition complete");
        Ok(transition)
    }

    async fn button_pressed(&mut self) -> bool {
        match self.devices.button.is_pressed().await {
            Ok(pressed) => pressed,
            Err(e) => {
                warn!(error = %e, "Button read failed");
                false
            }
        }
    }

    async fn notify(&mut self, cue: Cue) {
        if let Err(e) = self.devices.notifier.play(cue).await {
            warn!(error = %e, %cue, "Failed to play cue");
        }
    }

    async fn indicate(&mut self, on: bool) {
        if let Err(e) = self.devices.notifier.set_indicator(on).await {
            warn!(error = %e, on, "Failed to drive indicator");
        }
    }
}
