use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::CoreError;
use crate::sequence::GeneWindow;

/// A sub-region of the gene, relative to the gene's first base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fragment {
    pub relative_start: usize,
    pub length: usize,
}

impl Fragment {
    /// Exclusive end, relative to the gene.
    pub fn relative_end(&self) -> usize {
        self.relative_start + self.length
    }
}

/// Fragment coordinates translated back onto the reference, for user feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FragmentEcho {
    /// 1-based fragment number.
    pub number: usize,
    pub absolute_start: i64,
    pub absolute_end: i64,
}

impl FragmentEcho {
    pub fn total_size(&self) -> i64 {
        self.absolute_end - self.absolute_start
    }
}

impl fmt::Display for FragmentEcho {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Fragment {}: from {} to {} of the initial vector, total size: {}",
            self.number,
            self.absolute_start,
            self.absolute_end,
            self.total_size()
        )
    }
}

/// Check `start..end` against a gene of `gene_len` bases and convert it to a [`Fragment`].
pub fn validate_fragment(gene_len: usize, start: i64, end: i64) -> Result<Fragment, CoreError> {
    if start < 0 {
        return Err(CoreError::range(start, end, "start must not be negative"));
    }
    if start >= end {
        return Err(CoreError::range(start, end, "start must be less than end"));
    }
    if end > gene_len as i64 {
        return Err(CoreError::range(
            start,
            end,
            format!("end exceeds the gene length ({})", gene_len),
        ));
    }
    Ok(Fragment {
        relative_start: start as usize,
        length: (end - start) as usize,
    })
}

/// Collects a fixed number of fragments one at a time.
///
/// Rejected coordinates leave the planner untouched so the caller can ask again
/// for the same fragment.
#[derive(Debug, Clone)]
pub struct FragmentPlanner {
    gene_len: usize,
    offset: usize,
    count: usize,
    fragments: Vec<Fragment>,
}

impl FragmentPlanner {
    pub fn new(gene_len: usize, offset: usize, count: usize) -> Result<Self, CoreError> {
        if count == 0 {
            return Err(CoreError::NoFragments);
        }
        Ok(Self {
            gene_len,
            offset,
            count,
            fragments: Vec::with_capacity(count),
        })
    }

    pub fn for_window(window: &GeneWindow, count: usize) -> Result<Self, CoreError> {
        Self::new(window.gene_len(), window.offset(), count)
    }

    pub fn gene_len(&self) -> usize {
        self.gene_len
    }

    /// 1-based number of the fragment the next [`submit`](Self::submit) will fill.
    pub fn next_number(&self) -> usize {
        self.fragments.len() + 1
    }

    pub fn is_complete(&self) -> bool {
        self.fragments.len() == self.count
    }

    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    /// Reference coordinates for the next fragment, computed before any validation.
    pub fn echo(&self, start: i64, end: i64) -> FragmentEcho {
        let offset = self.offset as i64;
        FragmentEcho {
            number: self.next_number(),
            absolute_start: offset + start,
            absolute_end: offset + end,
        }
    }

    pub fn submit(&mut self, start: i64, end: i64) -> Result<Fragment, CoreError> {
        if self.is_complete() {
            return Err(CoreError::range(
                start,
                end,
                format!("all {} fragments are already planned", self.count),
            ));
        }
        debug!(echo = %self.echo(start, end), "fragment coordinates received");
        let fragment = validate_fragment(self.gene_len, start, end)?;
        info!(
            number = self.next_number(),
            relative_start = fragment.relative_start,
            length = fragment.length,
            "fragment planned"
        );
        self.fragments.push(fragment);
        Ok(fragment)
    }

    pub fn finish(self) -> Result<Vec<Fragment>, CoreError> {
        if !self.is_complete() {
            return Err(CoreError::IncompletePlan {
                planned: self.fragments.len(),
                expected: self.count,
            });
        }
        Ok(self.fragments)
    }
}

/// Plan every fragment of a batch in one pass, reporting the first bad one.
pub fn plan_fragments(window: &GeneWindow, coords: &[(i64, i64)]) -> Result<Vec<Fragment>, CoreError> {
    let mut planner = FragmentPlanner::for_window(window, coords.len())?;
    for &(start, end) in coords {
        let number = planner.next_number();
        planner
            .submit(start, end)
            .map_err(|source| CoreError::InvalidFragment {
                number,
                source: Box::new(source),
            })?;
    }
    planner.finish()
}
