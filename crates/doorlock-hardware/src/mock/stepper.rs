//! Mock stepper motor driver.

use crate::{
    HardwareError, Result,
    traits::StepperMotor,
    types::{COILS_RELEASED, CoilLevels, FULL_STEP_SEQUENCE, StepperConfig},
};
use tracing::debug;

/// Mock four-wire stepper for testing and development.
///
/// Walks the full-step coil sequence for every step so the coil levels after
/// a move are the ones a real driver would leave energized. With
/// [`with_timing`](MockStepper::with_timing) a move also takes as long as it
/// would on the real motor at the configured speed.
///
/// # Examples
///
/// ```
/// use doorlock_hardware::mock::MockStepper;
/// use doorlock_hardware::traits::StepperMotor;
/// use doorlock_hardware::types::StepperConfig;
///
/// #[tokio::main]
/// async fn main() -> doorlock_hardware::Result<()> {
///     let mut motor = MockStepper::new();
///     motor.configure(&StepperConfig::new(2038, [4, 6, 5, 7])?).await?;
///     motor.set_speed(15).await?;
///
///     motor.rotate(1631).await?;
///     assert_eq!(motor.position(), 1631);
///     assert!(motor.coils_energized());
///
///     motor.release_coils().await?;
///     assert!(!motor.coils_energized());
///     Ok(())
/// }
/// ```
#[derive(Debug, Default)]
pub struct MockStepper {
    config: Option<StepperConfig>,
    rpm: u32,

    /// Net steps taken since creation
    position: i64,

    /// Index into the full-step sequence
    phase: usize,

    coils: CoilLevels,

    /// Step counts of completed moves, in order
    moves: Vec<i32>,

    simulate_timing: bool,
    fail_rotations: bool,
}

impl MockStepper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make each move last as long as on the real motor.
    pub fn with_timing(mut self) -> Self {
        self.simulate_timing = true;
        self
    }

    /// Make every following move stall after its first step.
    pub fn set_fail_rotations(&mut self, fail: bool) {
        self.fail_rotations = fail;
    }

    pub fn config(&self) -> Option<&StepperConfig> {
        self.config.as_ref()
    }

    pub fn speed_rpm(&self) -> u32 {
        self.rpm
    }

    pub fn position(&self) -> i64 {
        self.position
    }

    pub fn coil_levels(&self) -> CoilLevels {
        self.coils
    }

    /// Check if any coil line is driven high.
    pub fn coils_energized(&self) -> bool {
        self.coils.iter().any(|level| *level)
    }

    pub fn moves(&self) -> &[i32] {
        &self.moves
    }

    fn step(&mut self, forward: bool) {
        let len = FULL_STEP_SEQUENCE.len();
        self.phase = if forward {
            (self.phase + 1) % len
        } else {
            (self.phase + len - 1) % len
        };
        self.coils = FULL_STEP_SEQUENCE[self.phase];
        self.position += if forward { 1 } else { -1 };
    }
}

impl StepperMotor for MockStepper {
    async fn configure(&mut self, config: &StepperConfig) -> Result<()> {
        debug!(
            steps_per_revolution = config.steps_per_revolution,
            coil_pins = ?config.coil_pins,
            "Mock stepper configured"
        );
        self.config = Some(*config);
        Ok(())
    }

    async fn set_speed(&mut self, rpm: u32) -> Result<()> {
        if rpm == 0 {
            return Err(HardwareError::configuration("Stepper speed must be greater than 0"));
        }
        self.rpm = rpm;
        Ok(())
    }

    async fn rotate(&mut self, steps: i32) -> Result<()> {
        let config = self
            .config
            .ok_or_else(|| HardwareError::configuration("Stepper not configured"))?;
        if self.rpm == 0 {
            return Err(HardwareError::configuration("Stepper speed not set"));
        }

        let forward = steps > 0;
        if self.fail_rotations && steps != 0 {
            self.step(forward);
            return Err(HardwareError::actuator(format!(
                "stalled after 1 of {} steps",
                steps.unsigned_abs()
            )));
        }

        for _ in 0..steps.unsigned_abs() {
            self.step(forward);
        }

        if self.simulate_timing {
            let total = config.step_delay(self.rpm) * steps.unsigned_abs();
            tokio::time::sleep(total).await;
        }

        self.moves.push(steps);
        debug!(steps, position = self.position, "Mock stepper move complete");
        Ok(())
    }

    async fn release_coils(&mut self) -> Result<()> {
        self.coils = COILS_RELEASED;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn configured() -> MockStepper {
        let mut motor = MockStepper::new();
        motor
            .configure(&StepperConfig::new(2038, [4, 6, 5, 7]).unwrap())
            .await
            .unwrap();
        motor.set_speed(15).await.unwrap();
        motor
    }

    #[tokio::test]
    async fn test_rotate_requires_configuration() {
        let mut motor = MockStepper::new();
        assert!(motor.rotate(10).await.is_err());

        motor
            .configure(&StepperConfig::new(2038, [4, 6, 5, 7]).unwrap())
            .await
            .unwrap();
        assert!(motor.rotate(10).await.is_err());
    }

    #[tokio::test]
    async fn test_zero_speed_rejected() {
        let mut motor = MockStepper::new();
        assert!(motor.set_speed(0).await.is_err());
    }

    #[tokio::test]
    async fn test_round_trip_returns_to_origin() {
        let mut motor = configured().await;
        motor.rotate(1631).await.unwrap();
        motor.rotate(-1631).await.unwrap();

        assert_eq!(motor.position(), 0);
        assert_eq!(motor.moves(), &[1631, -1631]);
    }

    #[tokio::test]
    async fn test_coils_follow_full_step_sequence() {
        let mut motor = configured().await;
        assert!(!motor.coils_energized());

        motor.rotate(1).await.unwrap();
        assert_eq!(motor.coil_levels(), FULL_STEP_SEQUENCE[1]);

        motor.rotate(-2).await.unwrap();
        assert_eq!(motor.coil_levels(), FULL_STEP_SEQUENCE[3]);

        motor.release_coils().await.unwrap();
        assert_eq!(motor.coil_levels(), COILS_RELEASED);
    }

    #[tokio::test]
    async fn test_failing_rotation_leaves_coils_energized() {
        let mut motor = configured().await;
        motor.set_fail_rotations(true);

        let result = motor.rotate(100).await;
        assert!(matches!(result, Err(HardwareError::ActuatorError { .. })));
        assert!(motor.coils_energized());
        assert!(motor.moves().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_timed_rotation_takes_step_delay() {
        let mut motor = MockStepper::new().with_timing();
        motor
            .configure(&StepperConfig::new(200, [1, 2, 3, 4]).unwrap())
            .await
            .unwrap();
        motor.set_speed(60).await.unwrap();

        let started = tokio::time::Instant::now();
        motor.rotate(100).await.unwrap();
        assert!(started.elapsed() >= std::time::Duration::from_millis(500));
    }
}
