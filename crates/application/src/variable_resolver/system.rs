//! System variables
//!
//! Read-only `system__*` values computed by the platform. Each value can be
//! read at two cadences: the snapshot captured when the session started, or a
//! live value sampled at the moment of use. Variables without a live source
//! fall back to their snapshot.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use dynvar_domain::{SessionMetadata, VariableValue};

use crate::ports::Clock;

/// When a system value is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cadence {
    /// Captured once at session start and held constant (prompt fields).
    Snapshot,
    /// Recomputed at each use (tool parameters).
    Live,
}

/// The fixed catalog of system variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SystemVariable {
    /// `system__agent_id`
    AgentId,
    /// `system__caller_id`
    CallerId,
    /// `system__called_number`
    CalledNumber,
    /// `system__call_duration_secs`
    CallDurationSecs,
    /// `system__time_utc`
    TimeUtc,
    /// `system__conversation_id`
    ConversationId,
    /// `system__call_sid`
    CallSid,
}

/// Information about a system variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemVariableInfo {
    /// Variable name, including the `system__` prefix.
    pub name: &'static str,
    /// Human-readable description.
    pub description: &'static str,
    /// Example output.
    pub example: &'static str,
    /// Whether the live cadence recomputes this value.
    pub has_live_source: bool,
}

impl SystemVariable {
    /// Every catalog entry.
    pub const ALL: [Self; 7] = [
        Self::AgentId,
        Self::CallerId,
        Self::CalledNumber,
        Self::CallDurationSecs,
        Self::TimeUtc,
        Self::ConversationId,
        Self::CallSid,
    ];

    /// Returns the placeholder name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::AgentId => "system__agent_id",
            Self::CallerId => "system__caller_id",
            Self::CalledNumber => "system__called_number",
            Self::CallDurationSecs => "system__call_duration_secs",
            Self::TimeUtc => "system__time_utc",
            Self::ConversationId => "system__conversation_id",
            Self::CallSid => "system__call_sid",
        }
    }

    /// Looks up a catalog entry by placeholder name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.name() == name)
    }

    /// Returns true if the value changes over the session.
    #[must_use]
    pub const fn has_live_source(self) -> bool {
        matches!(self, Self::CallDurationSecs | Self::TimeUtc)
    }

    /// Returns the catalog description.
    #[must_use]
    pub const fn info(self) -> SystemVariableInfo {
        let (description, example) = match self {
            Self::AgentId => ("Identifier of the agent handling the session", "agent_123"),
            Self::CallerId => ("Caller phone number (phone calls only)", "+15550100"),
            Self::CalledNumber => ("Dialled phone number (phone calls only)", "+15550199"),
            Self::CallDurationSecs => ("Seconds since the session started", "42"),
            Self::TimeUtc => ("Current UTC time in ISO 8601", "2024-01-26T12:00:00Z"),
            Self::ConversationId => (
                "Conversation identifier",
                "0190a1b2-c3d4-7e5f-8a9b-0c1d2e3f4a5b",
            ),
            Self::CallSid => ("Call or session identifier", "CA1234567890"),
        };
        SystemVariableInfo {
            name: self.name(),
            description,
            example,
            has_live_source: self.has_live_source(),
        }
    }
}

/// Returns the whole catalog with descriptions.
#[must_use]
pub fn catalog() -> Vec<SystemVariableInfo> {
    SystemVariable::ALL.into_iter().map(SystemVariable::info).collect()
}

/// An immutable set of system values sampled at one cadence and instant.
#[derive(Debug, Clone, PartialEq)]
pub struct SystemFrame {
    cadence: Cadence,
    values: BTreeMap<SystemVariable, VariableValue>,
}

impl SystemFrame {
    /// A frame with no values; every system placeholder is unresolved.
    #[must_use]
    pub const fn empty(cadence: Cadence) -> Self {
        Self {
            cadence,
            values: BTreeMap::new(),
        }
    }

    /// The cadence this frame was sampled at.
    #[must_use]
    pub const fn cadence(&self) -> Cadence {
        self.cadence
    }

    /// Returns the value of a catalog entry, if present for this session.
    #[must_use]
    pub fn get(&self, variable: SystemVariable) -> Option<&VariableValue> {
        self.values.get(&variable)
    }

    /// Returns the value for a placeholder name.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&VariableValue> {
        SystemVariable::from_name(name).and_then(|v| self.get(v))
    }

    /// Iterates over the present values in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = (SystemVariable, &VariableValue)> {
        self.values.iter().map(|(k, v)| (*k, v))
    }
}

/// Computes system variable values for one session.
///
/// All methods take `&self`; concurrent tool invocations each sample their
/// own frame without locking.
pub struct SystemVariableProvider {
    metadata: SessionMetadata,
    clock: Arc<dyn Clock>,
    started_at: DateTime<Utc>,
    snapshot: SystemFrame,
}

impl std::fmt::Debug for SystemVariableProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SystemVariableProvider")
            .field("metadata", &self.metadata)
            .field("started_at", &self.started_at)
            .field("snapshot", &self.snapshot)
            .finish_non_exhaustive()
    }
}

impl SystemVariableProvider {
    /// Creates a provider and captures the session-start snapshot.
    ///
    /// The start time comes from `metadata.started_at` when present, otherwise
    /// from the clock.
    pub fn new(metadata: SessionMetadata, clock: Arc<dyn Clock>) -> Self {
        let now = clock.now();
        let started_at = metadata.started_at.unwrap_or(now);
        let mut provider = Self {
            metadata,
            clock,
            started_at,
            snapshot: SystemFrame::empty(Cadence::Snapshot),
        };
        provider.snapshot = provider.sample(Cadence::Snapshot, now);
        provider
    }

    /// The metadata this provider was built from.
    #[must_use]
    pub const fn metadata(&self) -> &SessionMetadata {
        &self.metadata
    }

    /// When the session started.
    #[must_use]
    pub const fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Returns the value captured at session start.
    #[must_use]
    pub fn snapshot(&self, variable: SystemVariable) -> Option<VariableValue> {
        self.snapshot.get(variable).cloned()
    }

    /// Returns a freshly computed value, or the snapshot for variables with no
    /// live source.
    #[must_use]
    pub fn live(&self, variable: SystemVariable) -> Option<VariableValue> {
        if variable.has_live_source() {
            self.compute(variable, self.clock.now())
        } else {
            self.snapshot(variable)
        }
    }

    /// Returns a value at an explicit cadence.
    #[must_use]
    pub fn value(&self, variable: SystemVariable, cadence: Cadence) -> Option<VariableValue> {
        match cadence {
            Cadence::Snapshot => self.snapshot(variable),
            Cadence::Live => self.live(variable),
        }
    }

    /// Looks up a placeholder name at an explicit cadence.
    ///
    /// Returns `None` for names outside the catalog and for values this
    /// session does not have.
    #[must_use]
    pub fn lookup(&self, name: &str, cadence: Cadence) -> Option<VariableValue> {
        SystemVariable::from_name(name).and_then(|v| self.value(v, cadence))
    }

    /// Returns the session-start frame.
    #[must_use]
    pub fn snapshot_frame(&self) -> SystemFrame {
        self.snapshot.clone()
    }

    /// Samples the clock once and returns a frame of live values.
    #[must_use]
    pub fn live_frame(&self) -> SystemFrame {
        self.sample(Cadence::Live, self.clock.now())
    }

    /// Returns a frame at the given cadence.
    #[must_use]
    pub fn frame(&self, cadence: Cadence) -> SystemFrame {
        match cadence {
            Cadence::Snapshot => self.snapshot_frame(),
            Cadence::Live => self.live_frame(),
        }
    }

    fn sample(&self, cadence: Cadence, now: DateTime<Utc>) -> SystemFrame {
        let values = SystemVariable::ALL
            .into_iter()
            .filter_map(|v| self.compute(v, now).map(|value| (v, value)))
            .collect();
        SystemFrame { cadence, values }
    }

    fn compute(&self, variable: SystemVariable, now: DateTime<Utc>) -> Option<VariableValue> {
        let meta = &self.metadata;
        match variable {
            SystemVariable::AgentId => Some(meta.agent_id.clone().into()),
            SystemVariable::CallerId => meta.caller_id.clone().map(Into::into),
            SystemVariable::CalledNumber => meta.called_number.clone().map(Into::into),
            SystemVariable::ConversationId => Some(meta.conversation_id.clone().into()),
            SystemVariable::CallSid => Some(meta.call_sid.clone().into()),
            SystemVariable::TimeUtc => Some(now.to_rfc3339_opts(SecondsFormat::Secs, true).into()),
            SystemVariable::CallDurationSecs => {
                let secs = self.duration_secs(now);
                Some(VariableValue::Number(f64::from(
                    u32::try_from(secs).unwrap_or(u32::MAX),
                )))
            }
        }
    }

    /// Elapsed whole seconds at `now`, floored at zero.
    ///
    /// Depends only on the frame's own instant, so concurrent frames never
    /// see each other's values. A non-decreasing [`Clock`] keeps successive
    /// samples non-decreasing.
    fn duration_secs(&self, now: DateTime<Utc>) -> u64 {
        u64::try_from((now - self.started_at).num_seconds()).unwrap_or(0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    struct ManualClock(Mutex<DateTime<Utc>>);

    impl ManualClock {
        fn at(start: DateTime<Utc>) -> Arc<Self> {
            Arc::new(Self(Mutex::new(start)))
        }

        fn set(&self, t: DateTime<Utc>) {
            *self.0.lock().unwrap() = t;
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            *self.0.lock().unwrap()
        }
    }

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 26, 12, 0, 0).unwrap()
    }

    fn metadata() -> SessionMetadata {
        SessionMetadata::new("agent_123")
            .with_conversation_id("conv_1")
            .with_call_sid("CA1")
    }

    #[test]
    fn catalog_names_are_reserved_and_unique() {
        let infos = catalog();
        assert_eq!(infos.len(), 7);
        for info in &infos {
            assert!(info.name.starts_with(dynvar_domain::SYSTEM_PREFIX));
            assert_eq!(SystemVariable::from_name(info.name).map(|v| v.name()), Some(info.name));
        }
        assert!(SystemVariable::from_name("system__unknown").is_none());
    }

    #[test]
    fn snapshot_is_fixed_at_start() {
        let clock = ManualClock::at(start());
        let provider = SystemVariableProvider::new(metadata(), clock.clone());

        clock.set(start() + Duration::seconds(90));

        assert_eq!(
            provider.snapshot(SystemVariable::TimeUtc),
            Some(VariableValue::from("2024-01-26T12:00:00Z"))
        );
        assert_eq!(
            provider.snapshot(SystemVariable::CallDurationSecs),
            Some(VariableValue::Number(0.0))
        );
    }

    #[test]
    fn live_recomputes_time_and_duration() {
        let clock = ManualClock::at(start());
        let provider = SystemVariableProvider::new(metadata(), clock.clone());

        clock.set(start() + Duration::seconds(90));

        assert_eq!(
            provider.live(SystemVariable::TimeUtc),
            Some(VariableValue::from("2024-01-26T12:01:30Z"))
        );
        assert_eq!(
            provider.live(SystemVariable::CallDurationSecs),
            Some(VariableValue::Number(90.0))
        );
    }

    #[test]
    fn live_falls_back_to_snapshot_without_live_source() {
        let clock = ManualClock::at(start());
        let provider = SystemVariableProvider::new(metadata(), clock.clone());
        clock.set(start() + Duration::seconds(5));

        assert_eq!(
            provider.live(SystemVariable::AgentId),
            provider.snapshot(SystemVariable::AgentId)
        );
        assert_eq!(
            provider.value(SystemVariable::ConversationId, Cadence::Live),
            Some(VariableValue::from("conv_1"))
        );
    }

    #[test]
    fn optional_phone_fields_are_absent_for_web_sessions() {
        let provider = SystemVariableProvider::new(metadata(), ManualClock::at(start()));
        assert_eq!(provider.snapshot(SystemVariable::CallerId), None);
        assert_eq!(provider.live(SystemVariable::CalledNumber), None);
        assert!(provider.snapshot_frame().lookup("system__caller_id").is_none());
    }

    #[test]
    fn phone_fields_present_for_calls() {
        let provider = SystemVariableProvider::new(
            metadata().with_phone("+15550100", "+15550199"),
            ManualClock::at(start()),
        );
        assert_eq!(
            provider.lookup("system__caller_id", Cadence::Snapshot),
            Some(VariableValue::from("+15550100"))
        );
        assert_eq!(
            provider.lookup("system__called_number", Cadence::Live),
            Some(VariableValue::from("+15550199"))
        );
    }

    #[test]
    fn explicit_start_time_is_used() {
        let clock = ManualClock::at(start() + Duration::seconds(30));
        let provider =
            SystemVariableProvider::new(metadata().with_started_at(start()), clock.clone());

        assert_eq!(provider.started_at(), start());
        assert_eq!(
            provider.snapshot(SystemVariable::CallDurationSecs),
            Some(VariableValue::Number(30.0))
        );
    }

    #[test]
    fn live_frame_samples_clock_once() {
        let clock = ManualClock::at(start());
        let provider = SystemVariableProvider::new(metadata(), clock.clone());
        clock.set(start() + Duration::seconds(61));

        let frame = provider.live_frame();
        assert_eq!(frame.cadence(), Cadence::Live);
        assert_eq!(
            frame.lookup("system__time_utc"),
            Some(&VariableValue::from("2024-01-26T12:01:01Z"))
        );
        assert_eq!(
            frame.get(SystemVariable::CallDurationSecs),
            Some(&VariableValue::Number(61.0))
        );

        clock.set(start() + Duration::seconds(120));
        assert_eq!(
            frame.get(SystemVariable::CallDurationSecs),
            Some(&VariableValue::Number(61.0))
        );
    }

    #[test]
    fn frame_values_come_from_its_own_sample() {
        let clock = ManualClock::at(start());
        let provider = SystemVariableProvider::new(metadata(), clock.clone());

        clock.set(start() + Duration::seconds(20));
        let later = provider.live_frame();
        clock.set(start() + Duration::seconds(10));
        let earlier = provider.live_frame();

        assert_eq!(
            later.get(SystemVariable::CallDurationSecs),
            Some(&VariableValue::Number(20.0))
        );
        // Time and duration agree even when another frame sampled later.
        assert_eq!(
            earlier.lookup("system__time_utc"),
            Some(&VariableValue::from("2024-01-26T12:00:10Z"))
        );
        assert_eq!(
            earlier.get(SystemVariable::CallDurationSecs),
            Some(&VariableValue::Number(10.0))
        );
    }

    #[test]
    fn duration_floors_at_zero_before_start() {
        let clock = ManualClock::at(start());
        let provider = SystemVariableProvider::new(metadata(), clock.clone());

        clock.set(start() - Duration::seconds(4));
        assert_eq!(
            provider.live(SystemVariable::CallDurationSecs),
            Some(VariableValue::Number(0.0))
        );
    }

    #[test]
    fn empty_frame_has_no_values() {
        let frame = SystemFrame::empty(Cadence::Snapshot);
        assert_eq!(frame.iter().count(), 0);
        assert!(frame.lookup("system__agent_id").is_none());
    }
}
