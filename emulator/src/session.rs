//! Interactive session driving the monitor core against the simulated
//! register file.
//!
//! Commands inject sensor values, fault status, and interrupt edges, then
//! run the same poll engine the firmware runs. Transcripts are logged per
//! profile so scenario runs can be diffed against expected captures.

use std::fs::{self, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use monitor_core::latch::MonitorIrqs;
use monitor_core::monitor::{MonitorEngine, PollReport, TickEvent};
use monitor_core::recorder::{AlertOutcome, RING_SIZE, RecorderPhase};
use monitor_core::regs::RegisterMap;
use monitor_core::telemetry::{TelemetryInstant, TelemetryRecorder};
use monitor_core::ticker::{CountdownTicker, TickCadence};

use crate::grammar::{Command, parse_command};
use crate::sim::SimBus;

pub const HELP_TOPICS: &[(&str, &str)] = &[
    ("tick", "tick [n]            - advance the sample timer n periods"),
    ("alert", "alert               - pulse the over-temperature alert line"),
    ("config", "config              - pulse the sensor config-clear line"),
    ("fault", "fault <value>       - set the fault-status register"),
    ("temp", "temp <loc> <rem>    - set the raw sensor readings"),
    ("status", "status              - show recorder and register state"),
    ("ring", "ring [n]            - dump the most recent n ring slots"),
    (
        "scenario",
        "scenario            - replay the profile's scripted sequence",
    ),
    ("help", "help [topic]        - show help for a command"),
];

/// Transcript profile selected on the command line.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TranscriptProfile {
    Steady,
    Alert,
    Fault,
}

impl TranscriptProfile {
    pub fn log_path(self) -> &'static str {
        match self {
            TranscriptProfile::Steady => "evidence/emulator-steady.log",
            TranscriptProfile::Alert => "evidence/emulator-alert.log",
            TranscriptProfile::Fault => "evidence/emulator-fault.log",
        }
    }

    pub fn header(self) -> &'static str {
        match self {
            TranscriptProfile::Steady => "Detector monitor emulator steady transcript",
            TranscriptProfile::Alert => "Detector monitor emulator alert transcript",
            TranscriptProfile::Fault => "Detector monitor emulator fault transcript",
        }
    }

    pub fn from_tag(tag: &str) -> Result<Self, String> {
        if tag.eq_ignore_ascii_case("steady") {
            Ok(Self::Steady)
        } else if tag.eq_ignore_ascii_case("alert") {
            Ok(Self::Alert)
        } else if tag.eq_ignore_ascii_case("fault") {
            Ok(Self::Fault)
        } else {
            Err(format!("Unknown transcript profile `{tag}`"))
        }
    }
}

/// Rendering class for one response line.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Severity {
    Info,
    Notice,
    Warning,
    Error,
}

/// One line of session output plus how to render it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Response {
    pub severity: Severity,
    pub text: String,
}

impl Response {
    fn info(text: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            text: text.into(),
        }
    }

    fn notice(text: impl Into<String>) -> Self {
        Self {
            severity: Severity::Notice,
            text: text.into(),
        }
    }

    fn warning(text: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            text: text.into(),
        }
    }

    fn error(text: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            text: text.into(),
        }
    }
}

/// Simulated-time instant: microseconds of emulated wall clock.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Ord, PartialOrd)]
pub struct SimInstant(pub u64);

impl TelemetryInstant for SimInstant {
    fn saturating_duration_since(&self, earlier: Self) -> core::time::Duration {
        core::time::Duration::from_micros(self.0.saturating_sub(earlier.0))
    }
}

pub struct Session {
    bus: SimBus,
    engine: MonitorEngine<'static>,
    irqs: &'static MonitorIrqs,
    ticker: CountdownTicker,
    cadence: TickCadence,
    telemetry: TelemetryRecorder<SimInstant>,
    now_micros: u64,
    profile: TranscriptProfile,
    transcript: TranscriptLogger,
    command_count: usize,
}

impl Session {
    pub fn new(profile: TranscriptProfile) -> io::Result<Self> {
        Self::build(profile, TranscriptLogger::new(profile)?)
    }

    /// Session without transcript files; used by tests.
    pub fn headless(profile: TranscriptProfile) -> Self {
        Self::build(profile, TranscriptLogger::disabled())
            .expect("headless session construction cannot fail")
    }

    fn build(profile: TranscriptProfile, transcript: TranscriptLogger) -> io::Result<Self> {
        let map = RegisterMap::lzts_default();
        let irqs: &'static MonitorIrqs = Box::leak(Box::new(MonitorIrqs::new()));
        Ok(Self {
            bus: SimBus::new(map),
            engine: MonitorEngine::new(irqs, map),
            irqs,
            ticker: CountdownTicker::new(1),
            cadence: TickCadence::Ms250,
            telemetry: TelemetryRecorder::new(),
            now_micros: 0,
            profile,
            transcript,
            command_count: 0,
        })
    }

    /// Read-only view of the poll engine (tests and status rendering).
    pub fn engine(&self) -> &MonitorEngine<'static> {
        &self.engine
    }

    /// Read-only view of the simulated register file.
    pub fn bus(&self) -> &SimBus {
        &self.bus
    }

    pub fn handle_command(&mut self, line: &str) -> io::Result<Vec<Response>> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Ok(Vec::new());
        }

        self.command_count += 1;
        self.transcript
            .append_line(self.now_micros, TranscriptRole::Host, trimmed)?;

        let responses = match parse_command(trimmed) {
            Ok(command) => self.execute(command),
            Err(failure) => vec![Response::error(format!("ERR {failure}"))],
        };

        for response in &responses {
            self.transcript
                .append_line(self.now_micros, TranscriptRole::Emulator, &response.text)?;
        }

        Ok(responses)
    }

    fn execute(&mut self, command: Command) -> Vec<Response> {
        match command {
            Command::Tick(count) => self.run_ticks(count),
            Command::Alert => {
                self.irqs.alert.raise();
                self.poll()
            }
            Command::Config => {
                self.irqs.config.raise();
                self.poll()
            }
            Command::Fault(value) => {
                self.bus.set_fault(value);
                vec![Response::info(format!("fault status set to {value:#x}"))]
            }
            Command::Temp { local, remote } => {
                self.bus.set_temps(local, remote);
                vec![Response::info(format!(
                    "sensor values set local={local:#04x} remote={remote:#04x}"
                ))]
            }
            Command::Status => self.render_status(),
            Command::Ring(count) => self.render_ring(count),
            Command::Scenario => self.run_scenario(),
            Command::Help(topic) => render_help(topic.as_deref()),
        }
    }

    fn run_ticks(&mut self, count: u32) -> Vec<Response> {
        let mut responses = Vec::new();
        for _ in 0..count {
            self.now_micros += self.cadence.period().as_micros() as u64;
            if self.ticker.advance(&self.irqs.tick) {
                responses.extend(self.poll());
            }
        }

        let recorder = self.engine.recorder();
        responses.push(Response::info(format!(
            "advanced {count} tick(s); sample counter {} phase {}",
            recorder.sample_counter(),
            phase_label(recorder.phase()),
        )));
        responses
    }

    fn poll(&mut self) -> Vec<Response> {
        match self.engine.poll_once(&mut self.bus) {
            Ok(report) => {
                self.telemetry
                    .record_poll(&report, SimInstant(self.now_micros));
                describe_report(&report)
            }
            Err(err) => vec![Response::error(format!("bus fault: {err}"))],
        }
    }

    fn render_status(&self) -> Vec<Response> {
        let recorder = self.engine.recorder();
        let map = *self.bus.map();
        vec![
            Response::info(format!("phase: {}", phase_label(recorder.phase()))),
            Response::info(format!("sample counter: {}", recorder.sample_counter())),
            Response::info(format!(
                "post samples: {}/{}",
                recorder.post_samples(),
                monitor_core::recorder::POST_WINDOW
            )),
            Response::info(format!("alert count: {}", recorder.alert_count())),
            Response::info(format!(
                "current temps: local={:#04x} remote={:#04x}",
                self.bus.peek(map.current_local),
                self.bus.peek(map.current_remote)
            )),
            Response::info(format!(
                "fault status: {:#x}",
                self.bus.peek(map.fault_status)
            )),
            Response::info(format!(
                "fault temp ptr: {}",
                self.bus.peek(map.fault_temp_ptr)
            )),
            Response::info(format!(
                "telemetry events recorded: {}",
                self.telemetry.len()
            )),
            Response::info(format!("commands handled: {}", self.command_count)),
        ]
    }

    fn render_ring(&self, count: u16) -> Vec<Response> {
        let recorder = self.engine.recorder();
        let count = count.min(RING_SIZE);
        // End at the published pointer once a capture completed, otherwise at
        // the most recently written slot.
        let end = if recorder.phase() == RecorderPhase::ArmedForClear {
            recorder.last_post_sample()
        } else {
            recorder.sample_counter().wrapping_sub(1) % RING_SIZE
        };

        let map = *self.bus.map();
        let mut responses = Vec::with_capacity(usize::from(count) + 1);
        responses.push(Response::info(format!(
            "ring tail ({count} slots ending at {end}):"
        )));
        for back in (0..count).rev() {
            let slot = (end + RING_SIZE - back) % RING_SIZE;
            responses.push(Response::info(format!(
                "  slot {slot:>3}: local={:#04x} remote={:#04x}",
                self.bus.ring_sample(map.local_mem_base, slot),
                self.bus.ring_sample(map.remote_mem_base, slot)
            )));
        }
        responses
    }

    fn run_scenario(&mut self) -> Vec<Response> {
        let script: &[Command] = match self.profile {
            TranscriptProfile::Steady => &[
                Command::Temp {
                    local: 0x30,
                    remote: 0x32,
                },
                Command::Tick(300),
                Command::Status,
            ],
            TranscriptProfile::Alert => &[
                Command::Fault(0xA0),
                Command::Temp {
                    local: 0x35,
                    remote: 0x38,
                },
                Command::Tick(51),
                Command::Temp {
                    local: 0x5A,
                    remote: 0x61,
                },
                Command::Alert,
                Command::Tick(128),
                Command::Status,
            ],
            TranscriptProfile::Fault => &[
                Command::Fault(0xA0),
                Command::Alert,
                Command::Tick(128),
                Command::Tick(10),
                Command::Fault(0),
                Command::Tick(1),
                Command::Status,
            ],
        };

        let mut responses = vec![Response::notice(format!(
            "replaying {} scenario ({} commands)",
            profile_label(self.profile),
            script.len()
        ))];
        for command in script {
            responses.extend(self.execute(command.clone()));
        }
        responses
    }
}

fn describe_report(report: &PollReport) -> Vec<Response> {
    let mut responses = Vec::new();

    match report.alert {
        Some(AlertOutcome::Latched { local, remote }) => responses.push(Response::warning(
            format!("alert latched: local={local:#04x} remote={remote:#04x}"),
        )),
        Some(AlertOutcome::AlreadyLatched) => responses.push(Response::notice(
            "alert edge ignored: cycle already active".to_string(),
        )),
        None => {}
    }

    if report.config_cleared {
        responses.push(Response::notice("sensor config cleared".to_string()));
    }

    match report.tick {
        Some(TickEvent::WindowComplete { last_sample }) => responses.push(Response::warning(
            format!("post window complete, last sample {last_sample}"),
        )),
        Some(TickEvent::FaultPending { status }) => responses.push(Response::notice(format!(
            "fault still asserted ({status:#x})"
        ))),
        Some(TickEvent::CycleRearmed) => {
            responses.push(Response::notice("fault cleared, cycle re-armed".to_string()));
        }
        Some(TickEvent::Recorded { .. }) | None => {}
    }

    responses
}

fn render_help(topic: Option<&str>) -> Vec<Response> {
    let mut responses = Vec::new();
    match topic {
        Some(target) if !target.is_empty() => {
            if let Some((_, detail)) = HELP_TOPICS
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(target))
            {
                responses.push(Response::info((*detail).to_string()));
            } else {
                responses.push(Response::error(format!("No help available for `{target}`.")));
            }
        }
        _ => {
            responses.push(Response::info("Available commands:".to_string()));
            for (_, detail) in HELP_TOPICS {
                responses.push(Response::info(format!("  {detail}")));
            }
        }
    }
    responses
}

fn phase_label(phase: RecorderPhase) -> &'static str {
    match phase {
        RecorderPhase::Idle => "idle",
        RecorderPhase::Capturing => "capturing",
        RecorderPhase::ArmedForClear => "armed-for-clear",
    }
}

fn profile_label(profile: TranscriptProfile) -> &'static str {
    match profile {
        TranscriptProfile::Steady => "steady",
        TranscriptProfile::Alert => "alert",
        TranscriptProfile::Fault => "fault",
    }
}

#[derive(Clone, Copy, Debug)]
enum TranscriptRole {
    Host,
    Emulator,
}

impl TranscriptRole {
    fn prefix(self) -> &'static str {
        match self {
            TranscriptRole::Host => ">>",
            TranscriptRole::Emulator => "<<",
        }
    }
}

struct TranscriptLogger {
    writer: Option<BufWriter<std::fs::File>>,
}

impl TranscriptLogger {
    fn new(profile: TranscriptProfile) -> io::Result<Self> {
        let path = Path::new(profile.log_path());
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;

        let mut logger = Self {
            writer: Some(BufWriter::new(file)),
        };
        logger.write_header(profile)?;
        Ok(logger)
    }

    fn disabled() -> Self {
        Self { writer: None }
    }

    fn write_header(&mut self, profile: TranscriptProfile) -> io::Result<()> {
        let Some(writer) = self.writer.as_mut() else {
            return Ok(());
        };
        writeln!(writer, "# {}", profile.header())?;
        writeln!(writer, "# Timestamps are emulated milliseconds")?;
        writeln!(writer)?;
        writer.flush()
    }

    fn append_line(&mut self, now_micros: u64, role: TranscriptRole, line: &str) -> io::Result<()> {
        let Some(writer) = self.writer.as_mut() else {
            return Ok(());
        };
        writeln!(
            writer,
            "[+{:>7} ms] {} {}",
            now_micros / 1_000,
            role.prefix(),
            line
        )?;
        writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steady_run_wraps_the_ring() {
        let mut session = Session::headless(TranscriptProfile::Steady);
        session.handle_command("temp 0x30 0x32").unwrap();
        session.handle_command("tick 300").unwrap();

        assert_eq!(session.engine().recorder().sample_counter(), 44);
        assert_eq!(
            session.engine().recorder().phase(),
            RecorderPhase::Idle
        );
    }

    #[test]
    fn alert_cycle_publishes_pointer_178() {
        let mut session = Session::headless(TranscriptProfile::Alert);
        session.handle_command("fault 0xA0").unwrap();
        session.handle_command("tick 51").unwrap();
        session.handle_command("alert").unwrap();
        session.handle_command("tick 128").unwrap();

        let map = *session.bus().map();
        assert_eq!(session.bus().peek(map.fault_temp_ptr), 178);
        assert_eq!(
            session.engine().recorder().phase(),
            RecorderPhase::ArmedForClear
        );
    }

    #[test]
    fn fault_scenario_rearms_after_clear() {
        let mut session = Session::headless(TranscriptProfile::Fault);
        let responses = session.handle_command("scenario").unwrap();

        assert!(
            responses
                .iter()
                .any(|response| response.text.contains("cycle re-armed"))
        );
        assert_eq!(session.engine().recorder().phase(), RecorderPhase::Idle);
        assert_eq!(session.engine().recorder().alert_count(), 0);
    }

    #[test]
    fn unknown_commands_yield_errors() {
        let mut session = Session::headless(TranscriptProfile::Steady);
        let responses = session.handle_command("warp 9").unwrap();
        assert_eq!(responses.len(), 1);
        assert_eq!(responses[0].severity, Severity::Error);
    }

    #[test]
    fn repeated_alert_edges_are_reported_as_ignored() {
        let mut session = Session::headless(TranscriptProfile::Alert);
        session.handle_command("fault 1").unwrap();
        session.handle_command("alert").unwrap();
        let responses = session.handle_command("alert").unwrap();
        assert!(
            responses
                .iter()
                .any(|response| response.text.contains("ignored"))
        );
    }
}
