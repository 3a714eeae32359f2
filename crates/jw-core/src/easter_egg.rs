//! Key-sequence easter eggs.

use std::time::Duration;
use tokio::time::Instant;

/// Typing this during stand-up starts disco mode.
pub const DANCE_TRIGGER: &str = "/dance";

pub const DISCO_COLORS: [&str; 6] = [
    "#FF4B4B", "#FF9642", "#4F46E5", "#10B981", "#F59E0B", "#EF4444",
];

/// Time each disco colour is held.
pub const DISCO_FRAME: Duration = Duration::from_millis(200);

/// Watches keystrokes for a trigger word and stays active for a while
/// after it is typed.
#[derive(Debug, Clone)]
pub struct EasterEgg {
    trigger: String,
    buffer: String,
    duration: Duration,
    active_since: Option<Instant>,
}

impl EasterEgg {
    pub fn new(trigger: impl Into<String>, duration: Duration) -> Self {
        Self {
            trigger: trigger.into(),
            buffer: String::new(),
            duration,
            active_since: None,
        }
    }

    /// The `/dance` egg with the given display time.
    pub fn dance(duration: Duration) -> Self {
        Self::new(DANCE_TRIGGER, duration)
    }

    /// Feed one key (or a pasted run of keys). Returns true when the
    /// trigger completes.
    pub fn press(&mut self, key: &str) -> bool {
        self.buffer.push_str(key);

        let keep = self.trigger.chars().count();
        let skip = self.buffer.chars().count().saturating_sub(keep);
        if skip > 0 {
            self.buffer = self.buffer.chars().skip(skip).collect();
        }

        if self.buffer == self.trigger {
            self.active_since = Some(Instant::now());
            return true;
        }
        false
    }

    pub fn is_active(&self) -> bool {
        self.active_since
            .map(|since| since.elapsed() < self.duration)
            .unwrap_or(false)
    }

    /// Background pair for the current disco frame, or `None` when the
    /// egg is not showing.
    pub fn disco_colors(&self) -> Option<(&'static str, &'static str)> {
        let since = self.active_since?;
        let elapsed = since.elapsed();
        if elapsed >= self.duration {
            return None;
        }
        Some(disco_frame(elapsed))
    }
}

/// Gradient colours for a moment `elapsed` into disco mode.
pub fn disco_frame(elapsed: Duration) -> (&'static str, &'static str) {
    let step = (elapsed.as_millis() / DISCO_FRAME.as_millis()) as usize;
    let index = step % DISCO_COLORS.len();
    (DISCO_COLORS[index], DISCO_COLORS[(index + 1) % DISCO_COLORS.len()])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_trigger_activates_for_duration() {
        let mut egg = EasterEgg::dance(Duration::from_secs(3));
        let mut fired = false;
        for key in ["x", "/", "d", "a", "n", "c", "e"] {
            fired = egg.press(key);
        }
        assert!(fired);
        assert!(egg.is_active());

        tokio::time::advance(Duration::from_millis(2999)).await;
        assert!(egg.is_active());
        tokio::time::advance(Duration::from_millis(2)).await;
        assert!(!egg.is_active());
        assert!(egg.disco_colors().is_none());
    }

    #[test]
    fn test_partial_sequence_does_not_fire() {
        let mut egg = EasterEgg::dance(Duration::from_secs(3));
        assert!(!egg.press("/dan"));
        assert!(!egg.press("ce!"));
        assert!(!egg.is_active());
    }

    #[test]
    fn test_disco_frames_cycle() {
        assert_eq!(disco_frame(Duration::ZERO), ("#FF4B4B", "#FF9642"));
        assert_eq!(disco_frame(Duration::from_millis(250)), ("#FF9642", "#4F46E5"));
        assert_eq!(disco_frame(Duration::from_millis(1000)), ("#EF4444", "#FF4B4B"));
        assert_eq!(disco_frame(Duration::from_millis(1200)), ("#FF4B4B", "#FF9642"));
    }
}
