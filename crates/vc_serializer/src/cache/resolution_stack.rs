use alloc::vec::Vec;
use core::fmt::{Debug, Formatter};

use super::serializer_cache::Request;

/// In-flight resolutions of one cache, outermost first.
///
/// Only kept in debug builds with the `debug` feature. It is reported in
/// logs and never changes what a resolution returns.
#[derive(Default)]
pub(super) struct ResolutionStack {
    stack: Vec<Request>,
}

impl ResolutionStack {
    pub const fn new() -> Self {
        Self { stack: Vec::new() }
    }

    pub fn push(&mut self, request: Request) {
        self.stack.push(request);
    }

    pub fn pop(&mut self) {
        self.stack.pop();
    }

    pub fn contains(&self, request: &Request) -> bool {
        self.stack.contains(request)
    }
}

impl Debug for ResolutionStack {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        let mut iter = self.stack.iter();

        if let Some(first) = iter.next() {
            writeln!(f, "{first}")?;
        }

        for request in iter {
            writeln!(f, " -> {request}")?;
        }

        Ok(())
    }
}
