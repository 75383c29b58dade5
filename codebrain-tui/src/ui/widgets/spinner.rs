const FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub struct Spinner;

impl Spinner {
    pub fn frame(tick: u64) -> &'static str {
        FRAMES[(tick as usize) % FRAMES.len()]
    }
}
