//! Common test utilities for integration tests.
//!
//! [`TestDoor`] wires a controller to mock devices and keeps the handles
//! that feed them, so a test can present inputs and then inspect what the
//! controller did.

#![allow(dead_code)]

use doorlock_controller::{DoorController, Peripherals};
use doorlock_core::{DoorConfig, LockState};
use doorlock_hardware::mock::{
    MockButton, MockButtonHandle, MockNotifier, MockRfid, MockRfidHandle, MockSerial,
    MockSerialHandle, MockStepper,
};
use doorlock_hardware::{COILS_RELEASED, TagFamily};

pub type MockDoorController =
    DoorController<MockButton, MockRfid, MockStepper, MockNotifier, MockSerial>;

/// Stored card used across tests.
pub const STORED_UID: [u8; 4] = [0xAA, 0xBB, 0xCC, 0xDD];

/// Bluetooth token used across tests.
pub const TOKEN: &str = "SECRET1";

/// Configuration with one stored card and the test token.
pub fn test_config() -> DoorConfig {
    let mut config = DoorConfig::default();
    config.credentials.keys = vec![hex_uid(&STORED_UID)];
    config.credentials.bluetooth_token = TOKEN.to_string();
    config
}

fn hex_uid(uid: &[u8]) -> String {
    uid.iter()
        .map(|b| format!("{b:02X}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// A started controller and the handles driving its mock inputs.
pub struct TestDoor {
    pub controller: MockDoorController,
    pub button: MockButtonHandle,
    pub rfid: MockRfidHandle,
    pub serial: MockSerialHandle,
}

impl TestDoor {
    pub async fn new() -> Self {
        Self::with_config(test_config()).await
    }

    pub async fn with_config(config: DoorConfig) -> Self {
        let (button, button_handle) = MockButton::new();
        let (reader, rfid_handle) = MockRfid::new();
        let (serial, serial_handle) = MockSerial::new();

        let mut controller = DoorController::new(
            &config,
            Peripherals {
                button,
                reader,
                motor: MockStepper::new(),
                notifier: MockNotifier::new(),
                serial,
            },
        )
        .expect("test config is valid");
        controller.start().await.expect("mock hardware starts");

        Self {
            controller,
            button: button_handle,
            rfid: rfid_handle,
            serial: serial_handle,
        }
    }

    /// Start in the locked position.
    pub async fn locked() -> Self {
        let mut door = Self::new().await;
        door.controller.lock().await.expect("lock succeeds");
        door
    }

    pub async fn present(&self, uid: &[u8], family: TagFamily) {
        self.rfid
            .present_card(uid.to_vec(), family)
            .await
            .expect("card presented");
    }

    pub fn send(&self, line: &str) {
        self.serial.send_line(line).expect("line sent");
    }

    pub fn state(&self) -> LockState {
        self.controller.state()
    }

    pub fn devices(&self) -> &Peripherals<MockButton, MockRfid, MockStepper, MockNotifier, MockSerial> {
        self.controller.devices()
    }

    pub async fn echoed(&self) -> Vec<String> {
        self.serial.drain_output().await
    }

    /// Assert that every coil line is driven low.
    pub fn assert_coils_released(&self) {
        assert_eq!(
            self.devices().motor.coil_levels(),
            COILS_RELEASED,
            "coils must be de-energized"
        );
    }

    /// Assert that the reader has no tag left selected and that every card
    /// read was released exactly once.
    pub fn assert_cards_released(&self) {
        let reader = &self.devices().reader;
        assert!(!reader.has_active_session(), "a tag was left selected");
        assert_eq!(reader.read_count(), reader.release_count());
    }
}
