//! Main control loop
//!
//! One loop iteration is split into cooperative steps. Each call to
//! [`Monitor::poll`] performs the next step against the device and says how
//! long to wait before the following call, so the same loop runs under a
//! blocking delay or an async timer.
//!
//! Iteration order:
//! 1. display on, battery bars, heart glyph
//! 2. pulse poll, `BPM <n>` line on a new beat
//! 3. serial relay after a settle delay, if input is pending
//! 4. breathing session if the rate is strictly above threshold
//! 5. trailing loop delay

use core::convert::Infallible;
use core::fmt::Write;

use embedded_hal::delay::DelayNs;
use heapless::{String, Vec};

use crate::battery::{BatteryReading, VoltageSampler};
use crate::config::{MonitorConfig, SessionPolicy, HEART_CELL, LABEL_CELL, RELAY_CELL, WELCOME_TEXT};
use crate::error::DeviceError;
use crate::pulse::PulseMonitor;
use crate::scheduler::BreathingSession;
use crate::state::{GuidanceState, Phase};
use crate::traits::{
    Actuator, AnalogInput, BeatSource, Cell, CharacterDisplay, DisplaySink, Glyph, SensorError,
    SerialPort,
};

/// Maximum events produced by a single step
pub const MAX_EVENTS: usize = 4;

/// Longest line written to the serial port
const BEAT_LINE_LEN: usize = 16;

/// Something observable that happened during a step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MonitorEvent {
    /// New beat detected and reported on serial
    Beat { bpm: u16 },
    /// Inbound serial text copied to the display
    TextRelayed { len: usize },
    /// Breathing session triggered
    SessionStarted { bpm: u16 },
    /// A phase began (label written, motor switched)
    PhaseEntered { phase: Phase, repetition: u8 },
    /// All repetitions done, motor off
    SessionFinished,
    /// Session aborted at a phase boundary, motor off
    SessionCancelled,
}

/// Result of one step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tick {
    /// Time to wait before the next call to [`Monitor::poll`] (ms)
    pub wait_ms: u32,
    /// Events produced by this step
    pub events: Vec<MonitorEvent, MAX_EVENTS>,
}

impl Tick {
    fn new(wait_ms: u32, events: Vec<MonitorEvent, MAX_EVENTS>) -> Self {
        Self { wait_ms, events }
    }
}

/// Peripherals the loop drives
///
/// Owned by the caller and lent to the monitor on every step.
pub struct Device<D, B, P, S, A> {
    /// Character LCD
    pub display: D,
    /// Battery gauge
    pub battery: VoltageSampler<B>,
    /// Beat detector front end
    pub pulse: PulseMonitor<P>,
    /// Serial text link
    pub serial: S,
    /// Vibration motor
    pub motor: A,
}

impl<D, B, P, S, A> Device<D, B, P, S, A>
where
    P: BeatSource,
{
    /// Assemble a device from its peripherals
    ///
    /// Fails if the beat source cannot report its starting count.
    pub fn new(
        display: D,
        battery_adc: B,
        beats: P,
        serial: S,
        motor: A,
        config: &MonitorConfig,
    ) -> Result<Self, DeviceError> {
        Ok(Self {
            display,
            battery: VoltageSampler::new(battery_adc, config.voltage_scale, config.bar_boundaries),
            pulse: PulseMonitor::new(beats).map_err(DeviceError::Pulse)?,
            serial,
            motor,
        })
    }
}

/// Where the loop resumes on the next call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
enum Stage {
    /// Start of an iteration
    Top,
    /// Settle delay done, copy serial input to the display
    Relay,
    /// A phase duration has been handed out
    Session,
}

/// The control loop
pub struct Monitor {
    config: MonitorConfig,
    session: BreathingSession,
    stage: Stage,
    /// Rate observed at the top of the current iteration
    bpm: u16,
    /// Wait handed out for the running phase (ms)
    armed_ms: u32,
    cancel_requested: bool,
}

impl Monitor {
    /// Create a monitor
    pub fn new(config: MonitorConfig) -> Self {
        Self {
            config,
            session: BreathingSession::new(config.breathing),
            stage: Stage::Top,
            bpm: 0,
            armed_ms: 0,
            cancel_requested: false,
        }
    }

    /// Active configuration
    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Current guidance state
    pub fn guidance(&self) -> GuidanceState {
        self.session.state()
    }

    /// Rate observed at the top of the current iteration
    pub fn bpm(&self) -> u16 {
        self.bpm
    }

    /// Power-on sequence: glyphs, greeting, motor off
    pub fn boot<D, B, P, S, A>(&mut self, device: &mut Device<D, B, P, S, A>) -> Result<(), DeviceError>
    where
        D: CharacterDisplay,
        A: Actuator,
    {
        device.display.clear()?;
        device.display.load_glyphs()?;
        device.display.write_text_at(Cell::new(0, 0), WELCOME_TEXT)?;
        device.motor.set_on(false);
        Ok(())
    }

    /// Ask for the running session to stop
    ///
    /// Only honoured under [`SessionPolicy::Cancellable`] while a session is
    /// running; takes effect at the next phase boundary.
    pub fn request_cancel(&mut self) -> bool {
        if self.config.session_policy != SessionPolicy::Cancellable || !self.session.is_active() {
            return false;
        }
        self.cancel_requested = true;
        true
    }

    /// Perform the next step of the loop
    pub fn poll<D, B, P, S, A>(&mut self, device: &mut Device<D, B, P, S, A>) -> Result<Tick, DeviceError>
    where
        D: CharacterDisplay,
        B: AnalogInput,
        P: BeatSource,
        S: SerialPort,
        A: Actuator,
    {
        let mut events = Vec::new();

        let wait_ms = match self.stage {
            Stage::Top => {
                self.refresh(device, &mut events)?;
                if device.serial.available() {
                    self.stage = Stage::Relay;
                    self.config.serial_settle_ms
                } else {
                    self.decide(device, &mut events)?
                }
            }
            Stage::Relay => {
                let len = Self::relay(device)?;
                push(&mut events, MonitorEvent::TextRelayed { len });
                self.decide(device, &mut events)?
            }
            Stage::Session => self.advance(device, &mut events)?,
        };

        Ok(Tick::new(wait_ms, events))
    }

    /// Display, battery, heart and pulse
    fn refresh<D, B, P, S, A>(
        &mut self,
        device: &mut Device<D, B, P, S, A>,
        events: &mut Vec<MonitorEvent, MAX_EVENTS>,
    ) -> Result<(), DeviceError>
    where
        D: CharacterDisplay,
        B: AnalogInput,
        P: BeatSource,
        S: SerialPort,
    {
        device.display.display_on()?;

        // No sample published yet, the gauge keeps what it shows
        match device.battery.sample() {
            Ok(reading) => Self::draw_bars(&mut device.display, &reading)?,
            Err(SensorError::Unavailable) => {}
            Err(e) => return Err(DeviceError::Battery(e)),
        }
        device.display.write_glyph_at(HEART_CELL, Glyph::Heart)?;

        let pulse = device.pulse.poll().map_err(DeviceError::Pulse)?;
        self.bpm = pulse.beats_per_minute;

        if pulse.beat_edge {
            let mut line: String<BEAT_LINE_LEN> = String::new();
            // Cannot overflow: "BPM 65535\r\n" is 11 bytes
            let _ = write!(line, "BPM {}\r\n", pulse.beats_per_minute);
            device.serial.write_str(&line)?;
            push(events, MonitorEvent::Beat { bpm: pulse.beats_per_minute });
        }

        Ok(())
    }

    fn draw_bars<D: CharacterDisplay>(display: &mut D, reading: &BatteryReading) -> Result<(), DeviceError> {
        for cell in reading.bars.cells() {
            display.write_glyph_at(*cell, Glyph::Bar)?;
        }
        Ok(())
    }

    /// Copy every buffered byte to the relay cell, returns the count
    fn relay<D, B, P, S, A>(device: &mut Device<D, B, P, S, A>) -> Result<usize, DeviceError>
    where
        D: CharacterDisplay,
        S: SerialPort,
    {
        device.display.set_cursor(RELAY_CELL.col, RELAY_CELL.row)?;

        let mut len = 0;
        while let Some(byte) = device.serial.read_byte() {
            device.display.write_byte(byte)?;
            len += 1;
        }
        Ok(len)
    }

    /// End of the sensing half: start a session or wait out the loop delay
    fn decide<D, B, P, S, A>(
        &mut self,
        device: &mut Device<D, B, P, S, A>,
        events: &mut Vec<MonitorEvent, MAX_EVENTS>,
    ) -> Result<u32, DeviceError>
    where
        D: CharacterDisplay,
        A: Actuator,
    {
        if self.bpm <= self.config.threshold_bpm || self.session.start().is_none() {
            self.stage = Stage::Top;
            return Ok(self.config.loop_delay_ms);
        }

        self.cancel_requested = false;
        push(events, MonitorEvent::SessionStarted { bpm: self.bpm });
        self.enter_phase(device, events)
    }

    /// Called once the handed-out phase duration has passed
    fn advance<D, B, P, S, A>(
        &mut self,
        device: &mut Device<D, B, P, S, A>,
        events: &mut Vec<MonitorEvent, MAX_EVENTS>,
    ) -> Result<u32, DeviceError>
    where
        D: CharacterDisplay,
        A: Actuator,
    {
        if self.cancel_requested {
            self.cancel_requested = false;
            self.session.cancel();
            device.motor.set_on(false);
            push(events, MonitorEvent::SessionCancelled);
            self.stage = Stage::Top;
            return Ok(self.config.loop_delay_ms);
        }

        self.session.tick(self.armed_ms);

        if self.session.is_active() {
            return self.enter_phase(device, events);
        }

        device.motor.set_on(false);
        push(events, MonitorEvent::SessionFinished);
        self.stage = Stage::Top;
        Ok(self.config.loop_delay_ms)
    }

    /// Write the label, switch the motor and arm the phase timer
    fn enter_phase<D, B, P, S, A>(
        &mut self,
        device: &mut Device<D, B, P, S, A>,
        events: &mut Vec<MonitorEvent, MAX_EVENTS>,
    ) -> Result<u32, DeviceError>
    where
        D: CharacterDisplay,
        A: Actuator,
    {
        let Some(cycle) = self.session.cycle() else {
            self.stage = Stage::Top;
            return Ok(self.config.loop_delay_ms);
        };

        // Unpadded: a shorter label leaves the tail of the previous one
        device.display.write_text_at(LABEL_CELL, cycle.phase.label())?;
        device.motor.set_on(self.session.motor_command());
        push(
            events,
            MonitorEvent::PhaseEntered {
                phase: cycle.phase,
                repetition: cycle.repetition,
            },
        );

        self.armed_ms = self.session.remaining_ms();
        self.stage = Stage::Session;
        Ok(self.armed_ms)
    }
}

fn push(events: &mut Vec<MonitorEvent, MAX_EVENTS>, event: MonitorEvent) {
    // A step never produces more than MAX_EVENTS events
    let _ = events.push(event);
}

/// Run the loop forever with a blocking delay
///
/// Only returns on a device error.
pub fn run_blocking<D, B, P, S, A, T>(
    monitor: &mut Monitor,
    device: &mut Device<D, B, P, S, A>,
    delay: &mut T,
) -> Result<Infallible, DeviceError>
where
    D: CharacterDisplay,
    B: AnalogInput,
    P: BeatSource,
    S: SerialPort,
    A: Actuator,
    T: DelayNs,
{
    loop {
        let tick = monitor.poll(device)?;
        delay.delay_ms(tick.wait_ms);
    }
}
