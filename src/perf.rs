//! Frame timing and profiler hookup
//!
//! Scopes are recorded through the `profiling` crate; with no backend feature
//! enabled they compile to nothing.

use std::time::Instant;

const WINDOW: usize = 60;

/// Rolling frame time, shown in the status bar
pub struct FrameTimer {
    last_frame: Instant,
    frame_times: [f32; WINDOW],
    frame_idx: usize,
}

impl FrameTimer {
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            frame_times: [16.67; WINDOW], // Initialize to 60fps
            frame_idx: 0,
        }
    }

    /// Call at start of each frame
    pub fn begin_frame(&mut self) {
        profiling::finish_frame!();

        let now = Instant::now();
        let dt = now.duration_since(self.last_frame).as_secs_f32() * 1000.0;
        self.last_frame = now;
        self.record(dt);
    }

    fn record(&mut self, dt_ms: f32) {
        self.frame_times[self.frame_idx] = dt_ms;
        self.frame_idx = (self.frame_idx + 1) % WINDOW;
    }

    /// Get average frame time in ms
    pub fn avg_frame_ms(&self) -> f32 {
        self.frame_times.iter().sum::<f32>() / WINDOW as f32
    }
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new()
    }
}

/// Start the puffin HTTP server when built with `profile-with-puffin`
#[cfg(feature = "profile-with-puffin")]
pub fn start_profiler() -> Option<puffin_http::Server> {
    puffin::set_scopes_on(true);
    let addr = format!("127.0.0.1:{}", puffin_http::DEFAULT_PORT);
    match puffin_http::Server::new(&addr) {
        Ok(server) => {
            tracing::info!("Puffin server listening on {}", addr);
            Some(server)
        }
        Err(e) => {
            tracing::warn!("Could not start puffin server: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_average_over_window() {
        let mut timer = FrameTimer::new();
        for _ in 0..WINDOW {
            timer.record(10.0);
        }
        assert!((timer.avg_frame_ms() - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_begin_frame_records() {
        let mut timer = FrameTimer::new();
        timer.begin_frame();
        std::thread::sleep(std::time::Duration::from_millis(5));
        timer.begin_frame();
        assert!(timer.avg_frame_ms() > 0.0);
    }
}
