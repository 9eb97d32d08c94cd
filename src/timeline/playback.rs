use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use super::state::Timeline;

/// Speeds offered by the speed control, in items per second.
pub const SPEED_STEPS: [f64; 5] = [0.5, 1.0, 2.0, 5.0, 10.0];

fn speed_valid(speed: f64) -> bool {
    speed.is_finite() && speed > 0.0
}

/// Ticks produced by a running playback, stamped with the generation they
/// were scheduled under.
struct Ticker {
    rx: mpsc::Receiver<u64>,
    stop: Arc<AtomicBool>,
}

/// Timed auto-advance through the display sequence.
///
/// A background thread sends generation-stamped ticks over a channel; the
/// event loop drains them with [`Playback::advance`]. `stop`, `set_speed`
/// and `dispose` bump the generation, so a tick that was already queued when
/// playback was cancelled is discarded on receipt rather than acted on.
/// Start/stop are idempotent, and a disposed driver refuses to start again.
pub struct Playback {
    speed: f64,
    generation: u64,
    disposed: bool,
    ticker: Option<Ticker>,
}

impl Playback {
    /// Create a stopped driver. An invalid configured speed falls back to
    /// 1 item/sec rather than producing a driver that can never start.
    pub fn new(speed: f64) -> Self {
        Playback {
            speed: if speed_valid(speed) { speed } else { 1.0 },
            generation: 0,
            disposed: false,
            ticker: None,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.ticker.is_some()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Begin ticking at the configured speed. No-op if already playing,
    /// disposed, or the speed is invalid.
    pub fn start(&mut self) {
        if self.disposed || self.ticker.is_some() || !speed_valid(self.speed) {
            return;
        }
        self.generation += 1;
        let generation = self.generation;
        let interval = Duration::from_secs_f64(1.0 / self.speed);
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = stop.clone();
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            while !stop_flag.load(Ordering::Relaxed) {
                thread::sleep(interval);
                if stop_flag.load(Ordering::Relaxed) {
                    break;
                }
                if tx.send(generation).is_err() {
                    break;
                }
            }
        });
        self.ticker = Some(Ticker { rx, stop });
    }

    /// Stop ticking. Idempotent; invalidates any tick already in flight.
    pub fn stop(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.stop.store(true, Ordering::Relaxed);
        }
        self.generation += 1;
    }

    pub fn toggle(&mut self) {
        if self.is_playing() {
            self.stop();
        } else {
            self.start();
        }
    }

    /// Change speed. Invalid speeds keep the previous value. While playing,
    /// the tick source is re-armed at the new interval without moving the
    /// cursor.
    pub fn set_speed(&mut self, speed: f64) {
        if !speed_valid(speed) {
            return;
        }
        self.speed = speed;
        if self.is_playing() {
            self.stop();
            self.start();
        }
    }

    /// Next faster / slower entry in [`SPEED_STEPS`].
    pub fn speed_up(&mut self) {
        if let Some(&next) = SPEED_STEPS.iter().find(|&&s| s > self.speed) {
            self.set_speed(next);
        }
    }

    pub fn slow_down(&mut self) {
        if let Some(&prev) = SPEED_STEPS.iter().rev().find(|&&s| s < self.speed) {
            self.set_speed(prev);
        }
    }

    /// Stop and release the driver. After disposal no tick fires, including
    /// any already queued.
    pub fn dispose(&mut self) {
        self.stop();
        self.disposed = true;
    }

    /// Stop playback and rewind to the start of the display sequence.
    pub fn reset(&mut self, timeline: &mut Timeline) {
        self.stop();
        timeline.jump_to_start();
    }

    /// Drain due ticks and apply them to the state machine. Each live tick
    /// advances the cursor by one; reaching the last position stops the
    /// driver. Returns the number of steps applied.
    pub fn advance(&mut self, timeline: &mut Timeline) -> usize {
        let mut applied = 0;
        let mut finished = false;
        if let Some(ticker) = &self.ticker {
            while let Ok(generation) = ticker.rx.try_recv() {
                if generation != self.generation {
                    // Scheduled before a stop or speed change
                    continue;
                }
                let len = timeline.display().len();
                if len == 0 || timeline.cursor() + 1 >= len {
                    finished = true;
                    break;
                }
                timeline.step_forward();
                applied += 1;
            }
        }
        if finished {
            self.stop();
        }
        applied
    }
}

impl Drop for Playback {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ItemKind, RawItem};
    use indexmap::IndexMap;
    use serde_json::{Value, json};
    use std::time::Instant;

    fn timeline(n: usize) -> Timeline {
        Timeline::new(
            (0..n)
                .map(|i| {
                    RawItem::new(
                        ItemKind::Event,
                        json!((i as i64) * 10),
                        IndexMap::new(),
                        Value::Null,
                    )
                })
                .collect(),
        )
    }

    /// Build a playing driver whose ticks are injected by hand.
    fn hand_driven(speed: f64) -> (Playback, mpsc::Sender<u64>) {
        let (tx, rx) = mpsc::channel();
        let playback = Playback {
            speed,
            generation: 1,
            disposed: false,
            ticker: Some(Ticker {
                rx,
                stop: Arc::new(AtomicBool::new(false)),
            }),
        };
        (playback, tx)
    }

    #[test]
    fn ticks_advance_until_the_end_then_stop() {
        let mut tl = timeline(3);
        let (mut playback, tx) = hand_driven(1.0);
        for _ in 0..10 {
            tx.send(1).unwrap();
        }
        let applied = playback.advance(&mut tl);
        // Two steps reach the last position; the next tick stops the driver
        assert_eq!(applied, 2);
        assert_eq!(tl.cursor(), 2);
        assert!(!playback.is_playing());
    }

    #[test]
    fn stale_generation_ticks_are_discarded() {
        let mut tl = timeline(5);
        let (mut playback, tx) = hand_driven(1.0);
        // Ticks left over from a schedule that was since torn down
        tx.send(0).unwrap();
        tx.send(0).unwrap();
        tx.send(1).unwrap();
        let applied = playback.advance(&mut tl);
        assert_eq!(applied, 1);
        assert_eq!(tl.cursor(), 1);
        assert!(playback.is_playing());
    }

    #[test]
    fn empty_sequence_stops_immediately() {
        let mut tl = timeline(0);
        let (mut playback, tx) = hand_driven(1.0);
        tx.send(1).unwrap();
        assert_eq!(playback.advance(&mut tl), 0);
        assert!(!playback.is_playing());
        assert_eq!(tl.cursor(), 0);
    }

    #[test]
    fn start_and_stop_are_idempotent() {
        let mut playback = Playback::new(10.0);
        assert!(!playback.is_playing());
        playback.stop();
        assert!(!playback.is_playing());

        playback.start();
        assert!(playback.is_playing());
        let generation = playback.generation;
        playback.start();
        // Second start did not re-arm
        assert_eq!(playback.generation, generation);

        playback.stop();
        playback.stop();
        assert!(!playback.is_playing());
    }

    #[test]
    fn invalid_speeds_are_refused() {
        let mut playback = Playback::new(f64::NAN);
        assert_eq!(playback.speed(), 1.0);

        playback.set_speed(0.0);
        assert_eq!(playback.speed(), 1.0);
        playback.set_speed(-3.0);
        assert_eq!(playback.speed(), 1.0);
        playback.set_speed(f64::INFINITY);
        assert_eq!(playback.speed(), 1.0);
        playback.set_speed(2.0);
        assert_eq!(playback.speed(), 2.0);
    }

    #[test]
    fn speed_steps_walk_the_ladder() {
        let mut playback = Playback::new(1.0);
        playback.speed_up();
        assert_eq!(playback.speed(), 2.0);
        playback.slow_down();
        playback.slow_down();
        assert_eq!(playback.speed(), 0.5);
        playback.slow_down();
        assert_eq!(playback.speed(), 0.5);
    }

    #[test]
    fn disposed_driver_never_starts_again() {
        let mut playback = Playback::new(5.0);
        playback.start();
        playback.dispose();
        assert!(!playback.is_playing());
        assert!(playback.is_disposed());
        playback.start();
        assert!(!playback.is_playing());
    }

    #[test]
    fn queued_ticks_do_nothing_after_stop() {
        let mut tl = timeline(5);
        let (mut playback, tx) = hand_driven(1.0);
        tx.send(1).unwrap();
        tx.send(1).unwrap();
        playback.stop();
        // The ticker is gone and the generation has moved on
        assert_eq!(playback.advance(&mut tl), 0);
        assert_eq!(tl.cursor(), 0);
    }

    #[test]
    fn real_timer_playback_terminates() {
        let mut tl = timeline(5);
        let mut playback = Playback::new(50.0);
        playback.start();
        assert!(playback.is_playing());

        let deadline = Instant::now() + Duration::from_secs(5);
        while playback.is_playing() && Instant::now() < deadline {
            playback.advance(&mut tl);
            thread::sleep(Duration::from_millis(2));
        }
        assert!(!playback.is_playing(), "playback did not stop in time");
        assert_eq!(tl.cursor(), 4);

        // No further movement once stopped
        thread::sleep(Duration::from_millis(50));
        playback.advance(&mut tl);
        assert_eq!(tl.cursor(), 4);
    }

    #[test]
    fn set_speed_while_playing_keeps_position() {
        let mut tl = timeline(10);
        tl.jump_to(3);
        let mut playback = Playback::new(0.5);
        playback.start();
        playback.set_speed(2.0);
        assert!(playback.is_playing());
        assert_eq!(playback.speed(), 2.0);
        assert_eq!(tl.cursor(), 3);
        playback.dispose();
    }
}
