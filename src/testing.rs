//! In-memory scripts for tests and benchmarks.
//!
//! [`VecLeafFactory`] and [`VecLongLeafFactory`] serve precomputed values
//! as if a script computed them, one table per segment. Every
//! `run_for_doc` is counted so callers can check that nothing is cached.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::script::{
    self, DoubleFieldScript, DoubleLeafFactory, EmittedValues, LongFieldScript, LongLeafFactory,
    ScriptError,
};
use crate::segment::{DocId, SegmentContext};

/// Leaf factory over per-segment tables of per-document values.
///
/// `segments[ord][doc]` holds the values of `doc` in segment `ord`.
#[derive(Debug, Clone)]
pub struct VecFactory<T> {
    field: String,
    segments: Vec<Arc<Vec<Vec<T>>>>,
    fail_on: Option<DocId>,
    runs: Arc<AtomicUsize>,
}

/// Double values served from memory.
pub type VecLeafFactory = VecFactory<f64>;

/// Long values served from memory.
pub type VecLongLeafFactory = VecFactory<i64>;

impl<T: Copy> VecFactory<T> {
    pub fn new<S: Into<String>>(field: S, segments: Vec<Vec<Vec<T>>>) -> Self {
        VecFactory {
            field: field.into(),
            segments: segments.into_iter().map(Arc::new).collect(),
            fail_on: None,
            runs: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Make every script fail with an evaluation error on `doc`.
    pub fn failing_on(mut self, doc: DocId) -> Self {
        self.fail_on = Some(doc);
        self
    }

    /// Total number of documents computed by scripts of this factory.
    pub fn runs(&self) -> usize {
        self.runs.load(Ordering::SeqCst)
    }

    fn script(&self, segment: &SegmentContext) -> script::Result<VecScript<T>> {
        let docs = self.segments.get(segment.ord()).ok_or_else(|| {
            ScriptError::malformed_segment(format!("{segment} is not readable"))
        })?;

        Ok(VecScript {
            docs: Arc::clone(docs),
            emitted: EmittedValues::new(self.field.clone()),
            fail_on: self.fail_on,
            runs: Arc::clone(&self.runs),
        })
    }
}

impl DoubleLeafFactory for VecFactory<f64> {
    fn new_instance(&self, segment: &SegmentContext) -> script::Result<Box<dyn DoubleFieldScript>> {
        Ok(Box::new(self.script(segment)?))
    }
}

impl LongLeafFactory for VecFactory<i64> {
    fn new_instance(&self, segment: &SegmentContext) -> script::Result<Box<dyn LongFieldScript>> {
        Ok(Box::new(self.script(segment)?))
    }
}

struct VecScript<T> {
    docs: Arc<Vec<Vec<T>>>,
    emitted: EmittedValues<T>,
    fail_on: Option<DocId>,
    runs: Arc<AtomicUsize>,
}

impl<T: Copy> VecScript<T> {
    fn run(&mut self, doc: DocId) -> script::Result<()> {
        self.runs.fetch_add(1, Ordering::SeqCst);
        self.emitted.clear();

        if self.fail_on == Some(doc) {
            return Err(ScriptError::evaluation(format!("cannot compute doc {doc}")));
        }
        if let Some(values) = self.docs.get(doc as usize) {
            for &value in values {
                self.emitted.emit(value)?;
            }
        }
        Ok(())
    }
}

impl DoubleFieldScript for VecScript<f64> {
    fn run_for_doc(&mut self, doc: DocId) -> script::Result<()> {
        self.run(doc)
    }

    fn values(&self) -> &[f64] {
        self.emitted.as_slice()
    }
}

impl LongFieldScript for VecScript<i64> {
    fn run_for_doc(&mut self, doc: DocId) -> script::Result<()> {
        self.run(doc)
    }

    fn values(&self) -> &[i64] {
        self.emitted.as_slice()
    }
}

#[derive(Debug, Clone, Copy)]
enum FailureKind {
    ResourceExhausted,
    MalformedSegment,
}

/// Leaf factory whose every `new_instance` call fails the same way.
#[derive(Debug, Clone)]
pub struct FailingLeafFactory {
    kind: FailureKind,
    message: String,
}

impl FailingLeafFactory {
    pub fn resource_exhausted<S: Into<String>>(message: S) -> Self {
        FailingLeafFactory {
            kind: FailureKind::ResourceExhausted,
            message: message.into(),
        }
    }

    pub fn malformed_segment<S: Into<String>>(message: S) -> Self {
        FailingLeafFactory {
            kind: FailureKind::MalformedSegment,
            message: message.into(),
        }
    }

    fn error(&self) -> ScriptError {
        match self.kind {
            FailureKind::ResourceExhausted => ScriptError::resource_exhausted(self.message.clone()),
            FailureKind::MalformedSegment => ScriptError::malformed_segment(self.message.clone()),
        }
    }
}

impl DoubleLeafFactory for FailingLeafFactory {
    fn new_instance(&self, _segment: &SegmentContext) -> script::Result<Box<dyn DoubleFieldScript>> {
        Err(self.error())
    }
}

impl LongLeafFactory for FailingLeafFactory {
    fn new_instance(&self, _segment: &SegmentContext) -> script::Result<Box<dyn LongFieldScript>> {
        Err(self.error())
    }
}
