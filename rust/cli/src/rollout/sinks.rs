// rust/cli/src/rollout/sinks.rs
#![forbid(unsafe_code)]

/// One periodic row emitted by the runner.
///
/// Transport struct: runner/stats compute fields, sinks only format/emit.
#[derive(Clone, Debug)]
pub struct ReportRow {
    pub step: u64,
    pub steps_total: u64,

    pub sps: f64,

    pub episodes_finished: u64,
    pub avg_ep_len: f64,
    pub max_ep_len: u64,

    pub score_per_step: f64,
    /// Best tile seen so far (over all episodes).
    pub best_tile: u32,
    pub wins: u64,
    /// Share of moves that left the board unchanged.
    pub illegal_rate: f64,

    /// Averages over all steps so far.
    pub avg_empty: f64,
    pub avg_merges_available: f64,
    pub corner_rate: f64,

    /// Average deltas per step (within episodes; resets on episode reset).
    pub avg_d_empty: f64,
    pub avg_d_tile_sum: f64,
}

/// Sink interface for periodic reporting.
pub trait RolloutSink {
    fn on_report_row(&mut self, row: &ReportRow, pb: Option<&indicatif::ProgressBar>);
}

/// Default sink: does nothing.
#[derive(Default)]
pub struct NoopSink;

impl RolloutSink for NoopSink {
    fn on_report_row(&mut self, _row: &ReportRow, _pb: Option<&indicatif::ProgressBar>) {}
}

/// Human-readable periodic table sink.
///
/// Cadence (every N steps) is handled by Runner. This sink prints whenever called.
pub struct TableSink {
    header_every: u64,
    rows_printed: u64,
}

impl TableSink {
    const DEFAULT_HEADER_EVERY: u64 = 20;

    /// If `header_every == 0`, a reasonable default is used.
    pub fn new(header_every: u64) -> Self {
        Self {
            header_every: if header_every == 0 {
                Self::DEFAULT_HEADER_EVERY
            } else {
                header_every
            },
            rows_printed: 0,
        }
    }

    fn header_line(&self) -> String {
        // Keep widths aligned with row_line().
        format!(
            "{:>21} {:>9} {:>5} {:>9} {:>9} {:>10} {:>6} {:>5} {:>7} {:>8} {:>8} {:>7} {:>12} {:>12}",
            "step/total",
            "sps",
            "eps",
            "avg_ep",
            "max_ep",
            "score/st",
            "best",
            "wins",
            "illegal",
            "avgEmpt",
            "avgMrg",
            "corner",
            "ΔEmpty",
            "ΔSum",
        )
    }

    fn sep_line(&self) -> String {
        "-".repeat(self.header_line().chars().count())
    }

    fn row_line(&self, r: &ReportRow) -> String {
        format!(
            "{:>10}/{:<10} {:>9.1} {:>5} {:>9.1} {:>9} {:>10.2} {:>6} {:>5} {:>7.3} {:>8.2} {:>8.2} {:>7.3} {:>12.2e} {:>12.2e}",
            r.step,
            r.steps_total,
            r.sps,
            r.episodes_finished,
            r.avg_ep_len,
            r.max_ep_len,
            r.score_per_step,
            r.best_tile,
            r.wins,
            r.illegal_rate,
            r.avg_empty,
            r.avg_merges_available,
            r.corner_rate,
            r.avg_d_empty,
            r.avg_d_tile_sum,
        )
    }
}

impl RolloutSink for TableSink {
    fn on_report_row(&mut self, row: &ReportRow, pb: Option<&indicatif::ProgressBar>) {
        let mut lines: Vec<String> = Vec::new();

        if self.rows_printed % self.header_every == 0 {
            lines.push(self.header_line());
            lines.push(self.sep_line());
        }

        lines.push(self.row_line(row));
        self.rows_printed += 1;

        if let Some(pb) = pb {
            for l in lines {
                pb.println(l);
            }
        } else {
            for l in lines {
                println!("{l}");
            }
        }
    }
}
