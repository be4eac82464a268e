use std::{
    io::{self, IsTerminal, Write},
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex, MutexGuard,
    },
    thread::{self, JoinHandle},
    time::Duration,
};

const FRAMES: [char; 4] = ['|', '/', '-', '\\'];
const FRAME_INTERVAL: Duration = Duration::from_millis(100);

type Output = Arc<Mutex<dyn Write + Send>>;

/// A user-visible marker for an operation that is still in flight.
pub trait Progress {
    fn start(&mut self, message: &str);

    /// Replaces the message while running.
    fn update(&mut self, message: &str) {
        self.stop();
        self.start(message);
    }

    /// Safe to call when already stopped or never started.
    fn stop(&mut self);
}

/// Single-line spinner on stdout.
///
/// On a terminal a background thread redraws the line; `stop` joins that
/// thread before returning and clears the line. Anything else gets the first
/// message of each start/stop cycle printed once, and updates are dropped.
pub struct AnimatedSpinner {
    interactive: bool,
    out: Output,
    announced: bool,
    running: Option<Animation>,
}

struct Animation {
    message: Arc<Mutex<String>>,
    stop: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

impl AnimatedSpinner {
    pub fn new() -> Self {
        Self::with_output(io::stdout().is_terminal(), Arc::new(Mutex::new(io::stdout())))
    }

    fn with_output(interactive: bool, out: Output) -> Self {
        Self {
            interactive,
            out,
            announced: false,
            running: None,
        }
    }
}

fn lock<T: ?Sized>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

impl Default for AnimatedSpinner {
    fn default() -> Self {
        Self::new()
    }
}

impl Progress for AnimatedSpinner {
    fn start(&mut self, message: &str) {
        self.stop();

        if !self.interactive {
            let mut out = lock(&self.out);
            let _ = writeln!(out, "{message}");
            let _ = out.flush();
            self.announced = true;
            return;
        }

        let message = Arc::new(Mutex::new(message.to_string()));
        let stop = Arc::new(AtomicBool::new(false));
        let message_thread = Arc::clone(&message);
        let stop_thread = Arc::clone(&stop);
        let out_thread = Arc::clone(&self.out);

        let handle = thread::spawn(move || {
            let mut frame = 0usize;

            while !stop_thread.load(Ordering::Acquire) {
                let text = lock(&message_thread).clone();

                let mut out = lock(&out_thread);
                let _ = write!(out, "\r\x1b[2K{} {}", text, FRAMES[frame % FRAMES.len()]);
                let _ = out.flush();
                drop(out);

                frame += 1;
                thread::park_timeout(FRAME_INTERVAL);
            }
        });

        self.running = Some(Animation {
            message,
            stop,
            handle,
        });
    }

    fn update(&mut self, message: &str) {
        match &self.running {
            Some(animation) => *lock(&animation.message) = message.to_string(),
            None if self.announced => {}
            None => self.start(message),
        }
    }

    fn stop(&mut self) {
        self.announced = false;

        let Some(animation) = self.running.take() else {
            return;
        };

        animation.stop.store(true, Ordering::Release);
        animation.handle.thread().unpark();
        let _ = animation.handle.join();

        let mut out = lock(&self.out);
        let _ = write!(out, "\r\x1b[2K");
        let _ = out.flush();
    }
}

impl Drop for AnimatedSpinner {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spinner(interactive: bool) -> (AnimatedSpinner, Arc<Mutex<Vec<u8>>>) {
        let buffer = Arc::new(Mutex::new(Vec::new()));
        let out: Output = buffer.clone();
        (AnimatedSpinner::with_output(interactive, out), buffer)
    }

    fn printed(buffer: &Arc<Mutex<Vec<u8>>>) -> String {
        String::from_utf8(buffer.lock().unwrap().clone()).unwrap()
    }

    #[test]
    fn stop_joins_animation_thread() {
        let (mut spinner, buffer) = spinner(true);
        spinner.start("Suspending foo");
        assert!(spinner.running.is_some());

        spinner.stop();
        assert!(spinner.running.is_none());
        assert!(printed(&buffer).ends_with("\r\x1b[2K"));
    }

    #[test]
    fn stop_without_start_is_a_no_op() {
        let (mut spinner, buffer) = spinner(true);
        spinner.stop();
        spinner.stop();
        assert!(spinner.running.is_none());
        assert!(printed(&buffer).is_empty());
    }

    #[test]
    fn update_replaces_running_message() {
        let (mut spinner, _buffer) = spinner(true);
        spinner.start("Starting foo");
        spinner.update("Waiting for foo");

        let message = spinner
            .running
            .as_ref()
            .map(|animation| animation.message.lock().unwrap().clone());
        assert_eq!(message.as_deref(), Some("Waiting for foo"));

        spinner.stop();
    }

    #[test]
    fn non_interactive_spinner_never_spawns() {
        let (mut spinner, _buffer) = spinner(false);
        spinner.start("Deleting foo");
        assert!(spinner.running.is_none());
        spinner.stop();
    }

    #[test]
    fn non_interactive_updates_keep_a_single_line() {
        let (mut spinner, buffer) = spinner(false);

        spinner.start("Suspending foo");
        spinner.update("Waiting for foo");
        spinner.update("Suspended foo");
        spinner.stop();

        assert_eq!(printed(&buffer), "Suspending foo\n");
    }

    #[test]
    fn non_interactive_restart_prints_again() {
        let (mut spinner, buffer) = spinner(false);

        spinner.start("Stopping foo");
        spinner.stop();
        spinner.update("Starting foo");

        assert_eq!(printed(&buffer), "Stopping foo\nStarting foo\n");
    }
}
