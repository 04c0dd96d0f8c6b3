use std::time::Duration;

pub const COUNT_DURATION: Duration = Duration::from_millis(2000);
pub const FRAME: Duration = Duration::from_millis(16);
/// Counters start this long after page load even if the stats are not yet in view.
pub const START_DELAY: Duration = Duration::from_millis(500);
const MAX_STARS: u32 = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterFrame {
    pub text: String,
    /// Star row for rating counters.
    pub stars: Option<String>,
}

/// Counts a statistic up from zero, one frame at a time.
#[derive(Debug, Clone)]
pub struct CounterAnimation {
    target: u32,
    suffix: String,
    increment: f32,
    current: f32,
    star_rating: bool,
    done: bool,
}

impl CounterAnimation {
    /// `label` is the stat's original text, e.g. `"100%"`; any non-digit
    /// suffix is kept on every frame.
    pub fn new(target: u32, label: &str, star_rating: bool) -> Self {
        let suffix = label.trim_start_matches(|c: char| c.is_ascii_digit());
        let frames = COUNT_DURATION.as_secs_f32() / FRAME.as_secs_f32();
        Self {
            target,
            suffix: suffix.to_string(),
            increment: target as f32 / frames,
            current: 0.0,
            star_rating,
            done: false,
        }
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Next frame; once the target is reached every call returns the final one.
    pub fn step(&mut self) -> CounterFrame {
        let value = if (self.current as u32) < self.target && !self.done {
            self.current += self.increment;
            (self.current.floor() as u32).min(self.target)
        } else {
            self.done = true;
            self.target
        };
        CounterFrame {
            text: format!("{value}{}", self.suffix),
            stars: self
                .star_rating
                .then(|| "★".repeat(value.min(MAX_STARS) as usize)),
        }
    }

    /// Runs frames until done and returns the last one.
    pub fn finish(&mut self) -> CounterFrame {
        loop {
            let frame = self.step();
            if self.done {
                return frame;
            }
        }
    }
}
