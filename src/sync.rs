//! Hand-off between interrupt-side producers and the tasks that consume them.
//!
//! - [`DeferredEvents`]: bounded, counting queue. The producer `give`s from
//!   interrupt context without blocking, the consumer task `take`s and
//!   waits forever. Events beyond the capacity are dropped and counted.
//! - [`Link`]: bounded point-to-point channel between tasks. Publishing waits
//!   for room; a full link means the consumer stalled and is logged.
//! - [`AngleCell`] and [`ReferenceStore`]: single-writer values read by the
//!   control loop. A reader may see a value one update stale.

use core::sync::atomic::{AtomicBool, AtomicI16, AtomicU32, AtomicU8, Ordering};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Channel, TrySendError};

use crate::config::{ADC_EVENT_DEPTH, COMMAND_QUEUE_DEPTH, ENCODER_EVENT_DEPTH, TELEMETRY_QUEUE_DEPTH};
use crate::drivers::yaw::EncoderSample;
use crate::error::Error;
use crate::state::{MotorCommand, Reading, ReferenceInputs};

pub type EncoderEvents = DeferredEvents<EncoderSample, ENCODER_EVENT_DEPTH>;
pub type AdcEvents = DeferredEvents<u16, ADC_EVENT_DEPTH>;
pub type CommandLink = Link<MotorCommand, COMMAND_QUEUE_DEPTH>;
pub type TelemetryLink = Link<Reading, TELEMETRY_QUEUE_DEPTH>;

// ── Interrupt to task ─────────────────────────────────────────────────────────

pub struct DeferredEvents<T, const N: usize> {
    queue: Channel<CriticalSectionRawMutex, T, N>,
    dropped: AtomicU32,
}

impl<T, const N: usize> DeferredEvents<T, N> {
    pub const fn new() -> Self {
        Self {
            queue: Channel::new(),
            dropped: AtomicU32::new(0),
        }
    }

    /// Post one event. Safe from interrupt context; never blocks.
    pub fn give(&self, event: T) -> Result<(), Error> {
        self.queue.try_send(event).map_err(|_| {
            let dropped = self.dropped.fetch_add(1, Ordering::Relaxed) + 1;
            debug!("deferred event dropped ({} total)", dropped);
            Error::EventDropped
        })
    }

    /// Wait for the next event.
    pub async fn take(&self) -> T {
        self.queue.receive().await
    }

    pub fn try_take(&self) -> Option<T> {
        self.queue.try_receive().ok()
    }

    /// Events lost to a saturated queue since start-up.
    pub fn dropped(&self) -> u32 {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl<T, const N: usize> Default for DeferredEvents<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

// ── Task to task ──────────────────────────────────────────────────────────────

pub struct Link<T, const N: usize> {
    queue: Channel<CriticalSectionRawMutex, T, N>,
}

impl<T, const N: usize> Link<T, N> {
    pub const fn new() -> Self {
        Self { queue: Channel::new() }
    }

    /// Send, waiting as long as it takes for room.
    pub async fn publish(&self, msg: T) {
        if let Err(TrySendError::Full(msg)) = self.queue.try_send(msg) {
            warn!("link saturated, consumer stalled");
            self.queue.send(msg).await;
        }
    }

    pub fn try_publish(&self, msg: T) -> Result<(), Error> {
        self.queue.try_send(msg).map_err(|_| Error::QueueFull)
    }

    pub async fn receive(&self) -> T {
        self.queue.receive().await
    }

    pub fn try_receive(&self) -> Option<T> {
        self.queue.try_receive().ok()
    }
}

impl<T, const N: usize> Default for Link<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

// ── Shared readouts ───────────────────────────────────────────────────────────

/// Latest yaw angle, written by the yaw task only.
pub struct AngleCell(AtomicI16);

impl AngleCell {
    pub const fn new() -> Self {
        Self(AtomicI16::new(0))
    }

    pub fn publish(&self, degrees: i16) {
        self.0.store(degrees, Ordering::Release);
    }

    pub fn degrees(&self) -> i16 {
        self.0.load(Ordering::Acquire)
    }
}

impl Default for AngleCell {
    fn default() -> Self {
        Self::new()
    }
}

/// Operator setpoints, written by the input task only.
///
/// `button_pushed` is a request, not a level: the control loop clears it
/// when it reads it with [`take_snapshot`](ReferenceStore::take_snapshot).
pub struct ReferenceStore {
    yaw_deg: AtomicI16,
    height_pct: AtomicU8,
    button_pushed: AtomicBool,
}

impl ReferenceStore {
    pub const fn new() -> Self {
        Self {
            yaw_deg: AtomicI16::new(0),
            height_pct: AtomicU8::new(0),
            button_pushed: AtomicBool::new(false),
        }
    }

    pub fn snapshot(&self) -> ReferenceInputs {
        ReferenceInputs {
            yaw_deg: self.yaw_deg.load(Ordering::Acquire),
            height_pct: self.height_pct.load(Ordering::Acquire),
            button_pushed: self.button_pushed.load(Ordering::Acquire),
        }
    }

    /// Like [`snapshot`](Self::snapshot), but consumes a pending takeoff
    /// request. Each request is seen by exactly one control tick.
    pub fn take_snapshot(&self) -> ReferenceInputs {
        ReferenceInputs {
            yaw_deg: self.yaw_deg.load(Ordering::Acquire),
            height_pct: self.height_pct.load(Ordering::Acquire),
            button_pushed: self.button_pushed.swap(false, Ordering::AcqRel),
        }
    }

    /// Store a yaw setpoint, wrapped into `[0, 360)`.
    pub fn set_yaw(&self, degrees: i16) {
        let wrapped = (degrees as i32).rem_euclid(360) as i16;
        self.yaw_deg.store(wrapped, Ordering::Release);
    }

    pub fn nudge_yaw(&self, delta: i16) {
        let current = self.yaw_deg.load(Ordering::Acquire);
        self.set_yaw(current.saturating_add(delta));
    }

    /// Store a height setpoint, clamped to 100 %.
    pub fn set_height(&self, percent: u8) {
        self.height_pct.store(percent.min(100), Ordering::Release);
    }

    pub fn nudge_height(&self, delta: i8) {
        let current = self.height_pct.load(Ordering::Acquire) as i16;
        let next = (current + delta as i16).clamp(0, 100);
        self.set_height(next as u8);
    }

    pub fn set_button_pushed(&self, pushed: bool) {
        self.button_pushed.store(pushed, Ordering::Release);
    }
}

impl Default for ReferenceStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_futures::block_on;

    #[test]
    fn events_beyond_capacity_are_dropped_and_counted() {
        let events: DeferredEvents<u16, 3> = DeferredEvents::new();
        for raw in 0..5u16 {
            let _ = events.give(raw);
        }
        assert_eq!(events.dropped(), 2);
        assert_eq!(events.give(99), Err(Error::EventDropped));

        assert_eq!(block_on(events.take()), 0);
        assert_eq!(events.try_take(), Some(1));
        assert_eq!(events.try_take(), Some(2));
        assert_eq!(events.try_take(), None);
    }

    #[test]
    fn events_keep_order() {
        let events: EncoderEvents = DeferredEvents::new();
        let first = EncoderSample::new(true, false, true);
        let second = EncoderSample::new(false, true, false);
        events.give(first).unwrap();
        events.give(second).unwrap();
        assert_eq!(block_on(events.take()), first);
        assert_eq!(block_on(events.take()), second);
        assert_eq!(events.dropped(), 0);
    }

    #[test]
    fn link_delivers_each_message_once() {
        let link: CommandLink = Link::new();
        block_on(link.publish(MotorCommand::new(74, 90)));
        assert_eq!(link.try_receive(), Some(MotorCommand::new(74, 90)));
        assert_eq!(link.try_receive(), None);
    }

    #[test]
    fn try_publish_reports_full_link() {
        let link: Link<u8, 1> = Link::new();
        assert_eq!(link.try_publish(1), Ok(()));
        assert_eq!(link.try_publish(2), Err(Error::QueueFull));
        assert_eq!(block_on(link.receive()), 1);
    }

    #[test]
    fn angle_cell_returns_last_published() {
        let angle = AngleCell::new();
        assert_eq!(angle.degrees(), 0);
        angle.publish(271);
        assert_eq!(angle.degrees(), 271);
    }

    #[test]
    fn reference_yaw_wraps() {
        let reference = ReferenceStore::new();
        reference.nudge_yaw(-15);
        assert_eq!(reference.snapshot().yaw_deg, 345);
        reference.nudge_yaw(30);
        assert_eq!(reference.snapshot().yaw_deg, 15);
        reference.set_yaw(720);
        assert_eq!(reference.snapshot().yaw_deg, 0);
    }

    #[test]
    fn reference_height_is_clamped() {
        let reference = ReferenceStore::new();
        reference.nudge_height(-10);
        assert_eq!(reference.snapshot().height_pct, 0);
        for _ in 0..12 {
            reference.nudge_height(10);
        }
        assert_eq!(reference.snapshot().height_pct, 100);
        reference.set_height(250);
        assert_eq!(reference.snapshot().height_pct, 100);
    }

    #[test]
    fn button_flag_round_trips() {
        let reference = ReferenceStore::new();
        assert!(!reference.snapshot().button_pushed);
        reference.set_button_pushed(true);
        assert!(reference.snapshot().button_pushed);
    }

    #[test]
    fn takeoff_request_is_consumed_once() {
        let reference = ReferenceStore::new();
        reference.set_yaw(30);
        reference.set_height(40);
        reference.set_button_pushed(true);

        let first = reference.take_snapshot();
        assert!(first.button_pushed);
        assert_eq!((first.yaw_deg, first.height_pct), (30, 40));

        let second = reference.take_snapshot();
        assert!(!second.button_pushed);
        assert_eq!((second.yaw_deg, second.height_pct), (30, 40));
    }
}
