//! Conversion of per-sample blocked flags into time windows

use chrono::{DateTime, Duration, Utc};
use ndarray::ArrayView1;
use std::fmt;

use crate::constraints::ConstraintKind;

/// A maximal interval over which a blocked/clear series stayed clear
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Window {
    pub begin: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Cause of the blocking that ended as the window opened
    pub initial: ConstraintKind,
    /// Cause of the blocking that closed the window
    pub terminal: ConstraintKind,
}

impl Window {
    /// Closed-interval membership test
    pub fn contains(&self, t: &DateTime<Utc>) -> bool {
        *t >= self.begin && *t <= self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.begin
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Window({} -> {}, initial={}, final={})",
            self.begin.to_rfc3339(),
            self.end.to_rfc3339(),
            self.initial,
            self.terminal
        )
    }
}

/// Half-open index ranges `[start, stop)` of every maximal run of `false`
pub fn clear_runs(blocked: ArrayView1<'_, bool>) -> Vec<(usize, usize)> {
    let mut runs = Vec::new();
    let mut current: Option<usize> = None;

    for (i, &b) in blocked.iter().enumerate() {
        match (b, current) {
            (false, None) => current = Some(i),
            (true, Some(start)) => {
                runs.push((start, i));
                current = None;
            }
            _ => {}
        }
    }

    if let Some(start) = current {
        runs.push((start, blocked.len()));
    }

    runs
}

/// Build windows from a blocked series sampled at `timestamps`.
///
/// Interior boundaries fall on the first and last clear sample of each run.
/// A run touching either end of the series is extended to the query's
/// `begin`/`end`. `classify` names the cause at a blocked sample index and is
/// used for the window's `initial`/`terminal` fields; edges of the series are
/// reported as [`ConstraintKind::Window`].
pub fn make_windows<F>(
    blocked: ArrayView1<'_, bool>,
    timestamps: &[DateTime<Utc>],
    begin: DateTime<Utc>,
    end: DateTime<Utc>,
    classify: F,
) -> Vec<Window>
where
    F: Fn(usize) -> ConstraintKind,
{
    let n = blocked.len();
    debug_assert_eq!(n, timestamps.len());

    clear_runs(blocked)
        .into_iter()
        .map(|(start, stop)| {
            let (win_begin, initial) = if start == 0 {
                (begin, ConstraintKind::Window)
            } else {
                (timestamps[start], classify(start - 1))
            };
            let (win_end, terminal) = if stop == n {
                (end, ConstraintKind::Window)
            } else {
                (timestamps[stop - 1], classify(stop))
            };
            Window {
                begin: win_begin,
                end: win_end,
                initial,
                terminal,
            }
        })
        .collect()
}
