//! Front-end facing controller: owns a machine run, its executor
//! thread, and the bridge thread that forwards program output and
//! diagnostics to caller-supplied callbacks.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::thread::JoinHandle;

use crate::debug::Debugger;
use crate::io::pipe::{BridgeEvent, ByteQueue, PipeIo};
use crate::vm::machine::Machine;

/// Lifecycle of a controller-driven run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunState {
    NotRunning,
    Running,
    Closing,
}

pub type OutputFn = Box<dyn FnMut(&[u8]) + Send>;
pub type DiagFn = Box<dyn FnMut(&str) + Send>;

struct RunShared {
    state: Mutex<RunState>,
    cond: Condvar,
}

impl RunShared {
    fn lock(&self) -> MutexGuard<'_, RunState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Runs one program at a time on a dedicated executor thread.
///
/// `load_program` and `run_program` are only valid while not running;
/// `stop_running` interrupts a blocked input read via the queue's
/// cancellation flag and joins both threads. All state transitions go
/// through a single mutex, with a condvar for completion waiters.
pub struct MachineController {
    shared: Arc<RunShared>,
    input: Arc<ByteQueue>,
    stop: Arc<AtomicBool>,
    out_cb: Arc<Mutex<OutputFn>>,
    err_cb: Arc<Mutex<DiagFn>>,
    image: Vec<u8>,
    program_loaded: bool,
    debugger: Option<Debugger>,
    executor: Option<JoinHandle<()>>,
    bridge: Option<JoinHandle<()>>,
}

impl MachineController {
    pub fn new(out: OutputFn, err: DiagFn) -> Self {
        Self {
            shared: Arc::new(RunShared {
                state: Mutex::new(RunState::NotRunning),
                cond: Condvar::new(),
            }),
            input: Arc::new(ByteQueue::new()),
            stop: Arc::new(AtomicBool::new(false)),
            out_cb: Arc::new(Mutex::new(out)),
            err_cb: Arc::new(Mutex::new(err)),
            image: Vec::new(),
            program_loaded: false,
            debugger: None,
            executor: None,
            bridge: None,
        }
    }

    pub fn run_state(&self) -> RunState {
        *self.shared.lock()
    }

    /// Attach a debugger for the next run. Only while not running; the
    /// debugger is consumed by that run.
    pub fn attach_debugger(&mut self, debugger: Debugger) -> bool {
        if *self.shared.lock() != RunState::NotRunning {
            return false;
        }
        self.debugger = Some(debugger);
        true
    }

    /// Read a program image from disk. Only while not running.
    pub fn load_program(&mut self, path: impl AsRef<Path>) -> std::io::Result<bool> {
        let bytes = std::fs::read(path)?;
        Ok(self.load_program_bytes(&bytes))
    }

    /// Stage a program image for the next run. Only while not running.
    pub fn load_program_bytes(&mut self, bytes: &[u8]) -> bool {
        if *self.shared.lock() != RunState::NotRunning {
            return false;
        }
        self.image = bytes.to_vec();
        self.program_loaded = true;
        true
    }

    /// Spawn the executor and bridge threads. Requires a loaded program
    /// and the not-running state; loading is consumed, so each run
    /// needs a fresh `load_program`.
    pub fn run_program(&mut self) -> bool {
        if self.run_state() != RunState::NotRunning || !self.program_loaded {
            return false;
        }
        // No live threads at this point; collect the previous run's.
        self.reap_threads();

        let mut state = self.shared.lock();
        self.program_loaded = false;
        self.stop.store(false, Ordering::SeqCst);
        self.input.reset();

        let (events_tx, events_rx) = mpsc::channel::<BridgeEvent>();
        let mut machine = Machine::with_stop_flag(
            PipeIo::new(Arc::clone(&self.input), events_tx),
            Arc::clone(&self.stop),
        );
        machine.load_image(&self.image);
        let mut debugger = self.debugger.take();

        let shared = Arc::clone(&self.shared);
        self.executor = Some(std::thread::spawn(move || {
            let result = match debugger.as_mut() {
                Some(hook) => machine.run_with_hook(hook),
                None => machine.run(),
            };
            match result {
                Ok(()) => log::debug!("executor finished"),
                Err(fault) => log::debug!("executor stopped: {fault}"),
            }
            // Dropping the machine drops the event sender, which lets
            // the bridge thread drain and exit.
            drop(machine);
            *shared.lock() = RunState::NotRunning;
            shared.cond.notify_all();
        }));

        let out_cb = Arc::clone(&self.out_cb);
        let err_cb = Arc::clone(&self.err_cb);
        self.bridge = Some(std::thread::spawn(move || {
            for event in events_rx {
                match event {
                    BridgeEvent::Output(byte) => {
                        let mut cb = out_cb.lock().unwrap_or_else(|e| e.into_inner());
                        (*cb)(&[byte]);
                    }
                    BridgeEvent::Diag(msg) => {
                        let mut cb = err_cb.lock().unwrap_or_else(|e| e.into_inner());
                        (*cb)(&msg);
                    }
                }
            }
        }));

        *state = RunState::Running;
        log::debug!("controller: running");
        true
    }

    /// Request a stop and wait for both threads. Safe to call in any
    /// state; returns once the controller is back to not-running.
    pub fn stop_running(&mut self) -> bool {
        {
            let mut state = self.shared.lock();
            if *state == RunState::Running {
                *state = RunState::Closing;
                log::debug!("controller: closing");
                self.stop.store(true, Ordering::SeqCst);
                self.input.cancel();
            }
        }
        self.reap_threads();
        true
    }

    /// Feed bytes to the running program's input.
    pub fn send_input(&self, bytes: &[u8]) {
        self.input.push(bytes);
    }

    /// Block until the current run (if any) has finished.
    pub fn wait_finished(&self) {
        let mut state = self.shared.lock();
        while *state != RunState::NotRunning {
            state = self
                .shared
                .cond
                .wait(state)
                .unwrap_or_else(|e| e.into_inner());
        }
    }

    fn reap_threads(&mut self) {
        if let Some(handle) = self.executor.take() {
            let _ = handle.join();
        }
        if let Some(handle) = self.bridge.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for MachineController {
    fn drop(&mut self) {
        self.stop_running();
    }
}
