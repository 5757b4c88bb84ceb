/// Events emitted while a workflow runs.
///
/// A phase is a named stretch of work; a task inside it has a known number of
/// steps (one per batch entry).
#[derive(Debug, Clone)]
pub enum Progress {
    PhaseStart { name: &'static str },
    PhaseFinish,

    TaskStart { total_steps: u64 },
    TaskIncrement,
    TaskFinish,

    Message(String),
}

pub type ProgressCallback<'a> = Box<dyn Fn(Progress) + Send + Sync + 'a>;

/// Forwards progress events to an optional callback. Shared by reference across
/// the worker threads of a batch.
#[derive(Default)]
pub struct ProgressReporter<'a> {
    callback: Option<ProgressCallback<'a>>,
}

impl<'a> ProgressReporter<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callback(callback: ProgressCallback<'a>) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    #[inline]
    pub fn report(&self, event: Progress) {
        if let Some(cb) = &self.callback {
            cb(event);
        }
    }

    /// Runs `f` between a `PhaseStart` and a `PhaseFinish` event.
    pub fn phase<T>(&self, name: &'static str, f: impl FnOnce() -> T) -> T {
        self.report(Progress::PhaseStart { name });
        let out = f();
        self.report(Progress::PhaseFinish);
        out
    }

    /// Runs `f` as a counted task of `total_steps`. `f` receives a ticker to call
    /// once per finished step.
    pub fn task<T>(&self, total_steps: usize, f: impl FnOnce(&(dyn Fn() + Sync)) -> T) -> T {
        self.report(Progress::TaskStart {
            total_steps: total_steps as u64,
        });
        let out = f(&|| self.report(Progress::TaskIncrement));
        self.report(Progress::TaskFinish);
        out
    }
}
