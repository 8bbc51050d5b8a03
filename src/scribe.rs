use crate::process::Process;
use crate::score::Score;

/// A sink for path-drawing commands.
///
/// A `move_to` implicitly closes any open subpath; `close` must arrive at
/// the end of tracing. Scribes are write-only: their state is observed
/// through whatever the implementation accumulates.
pub trait Scribe<P> {
    fn move_to(&mut self, to: P);
    fn line_to(&mut self, to: P);
    fn close(&mut self);
}

/// A scribe that only counts what it is told to draw.
#[derive(Debug, Clone, Copy, Default)]
pub struct CountingScribe {
    moves: i32,
    draws: i32,
}

impl CountingScribe {
    pub fn score(&self) -> Score {
        Score::new(self.moves, self.draws)
    }
}

impl<P> Scribe<P> for CountingScribe {
    fn move_to(&mut self, _to: P) {
        self.moves += 1;
    }

    fn line_to(&mut self, _to: P) {
        self.draws += 1;
    }

    fn close(&mut self) {}
}

/// One recorded drawing command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathOp<P> {
    MoveTo(P),
    LineTo(P),
    Close,
}

/// Records and scores a path so that it can be played back later.
///
/// Used when several alternative tracings are possible and the best must be
/// chosen without computing the winning trace again.
#[derive(Debug, Clone, Default)]
pub struct ReplayingScribe<P> {
    ops: Vec<PathOp<P>>,
    moves: i32,
    draws: i32,
}

impl<P: Copy> ReplayingScribe<P> {
    pub fn new() -> Self {
        Self {
            ops: Vec::new(),
            moves: 0,
            draws: 0,
        }
    }

    /// The score of everything recorded so far.
    pub fn score(&self) -> Score {
        Score::new(self.moves, self.draws)
    }

    /// The recorded command sequence.
    pub fn ops(&self) -> &[PathOp<P>] {
        &self.ops
    }

    /// Turn the recording into a process that re-issues it to `target`,
    /// one command per step.
    pub fn into_replay<S: Scribe<P>>(self, target: S) -> Replay<P, S> {
        Replay {
            ops: self.ops.into_iter(),
            target,
        }
    }
}

impl<P> Scribe<P> for ReplayingScribe<P> {
    fn move_to(&mut self, to: P) {
        self.moves += 1;
        self.ops.push(PathOp::MoveTo(to));
    }

    fn line_to(&mut self, to: P) {
        self.draws += 1;
        self.ops.push(PathOp::LineTo(to));
    }

    fn close(&mut self) {
        self.ops.push(PathOp::Close);
    }
}

/// Plays a recorded command sequence into another scribe.
pub struct Replay<P, S> {
    ops: std::vec::IntoIter<PathOp<P>>,
    target: S,
}

impl<P, S> Replay<P, S> {
    pub fn scribe(&self) -> &S {
        &self.target
    }

    pub fn into_scribe(self) -> S {
        self.target
    }
}

impl<P: Copy, S: Scribe<P>> Process for Replay<P, S> {
    fn process(&mut self) -> bool {
        match self.ops.next() {
            Some(PathOp::MoveTo(to)) => self.target.move_to(to),
            Some(PathOp::LineTo(to)) => self.target.line_to(to),
            Some(PathOp::Close) => self.target.close(),
            None => return false,
        }
        true
    }
}
