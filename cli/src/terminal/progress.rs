use std::sync::Arc;

use indicatif::ProgressStyle;
use snapr_core::scanner::ProgressHook;
use tracing::{Span, info_span};
use tracing_indicatif::span_ext::IndicatifSpanExt;

const TEMPLATE: &str =
    "{spinner:.blue} [{elapsed_precise}] {wide_bar:.green/bright_black} {pos}/{len} targets ({eta})";
const TICKS: &[&str] = &[
    "▁▁▁▁▁",
    "▁▂▂▂▁",
    "▁▄▂▄▁",
    "▂▄▆▄▂",
    "▄▆█▆▄",
    "▂▄▆▄▂",
    "▁▄▂▄▁",
    "▁▂▂▂▁",
];

/// Progress bar over the probing phase, driven by the per-probe hook.
///
/// The bar lives on a tracing span; it is drawn while the span is entered and
/// is a no-op when the span is filtered out (quiet mode).
pub struct ProbeProgress {
    span: Span,
}

impl ProbeProgress {
    pub fn new(total: usize) -> Self {
        let span = info_span!("probing");
        let style = ProgressStyle::with_template(TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .tick_strings(TICKS);
        span.pb_set_style(&style);
        span.pb_set_length(total as u64);
        Self { span }
    }

    pub fn span(&self) -> &Span {
        &self.span
    }

    pub fn hook(&self) -> ProgressHook {
        let span = self.span.clone();
        Arc::new(move |_done| span.pb_inc(1))
    }
}
