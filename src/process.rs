use rayon::prelude::*;

/// A unit of cooperative work, advanced one bounded step at a time.
///
/// `process` never blocks; an external scheduler may check for cancellation
/// between calls.
pub trait Process {
    /// Do one step of work. Returns true while work remains.
    fn process(&mut self) -> bool;

    /// Drive this process until it reports completion.
    fn run(&mut self) {
        while self.process() {}
    }
}

impl<P: Process + ?Sized> Process for Box<P> {
    fn process(&mut self) -> bool {
        (**self).process()
    }
}

/// Run every process to completion, in parallel.
///
/// The processes share no state, so completion order is irrelevant.
pub fn run_all<P: Process + Send>(processes: &mut [P]) {
    processes.par_iter_mut().for_each(|process| process.run());
}
