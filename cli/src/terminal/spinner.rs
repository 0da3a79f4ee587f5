use hostmap_core::pipeline::ProgressFn;
use indicatif::ProgressStyle;
use tracing::Span;
use tracing_indicatif::IndicatifLayer;
use tracing_indicatif::filter::IndicatifFilter;
use tracing_indicatif::span_ext::IndicatifSpanExt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::terminal::logging::HostmapFormatter;

const TICK_STRINGS: &[&str] = &[
    "▁▁▁▁▁",
    "▁▂▂▂▁",
    "▁▄▂▄▁",
    "▂▄▆▄▂",
    "▄▆█▆▄",
    "▂▄▆▄▂",
    "▁▄▂▄▁",
    "▁▂▂▂▁",
];

const PROGRESS_TEMPLATE: &str = "{spinner:.blue} {msg} {bar:32.green/bright_black} {pos}/{len}";

/// Installs the stderr log formatter and the progress bar layer.
///
/// `RUST_LOG` wins over the verbosity flags when set.
pub fn init_logging(verbose: u8, quiet: bool) {
    let level: &str = match (quiet, verbose) {
        (true, _) => "warn",
        (false, 0) => "info",
        (false, 1) => "debug",
        (false, _) => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let indicatif_layer = IndicatifLayer::new();
    let fmt_layer = tracing_subscriber::fmt::layer()
        .event_format(HostmapFormatter)
        .with_writer(indicatif_layer.get_stderr_writer());

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .with(indicatif_layer.with_filter(IndicatifFilter::new(false)))
        .init();
}

/// Turns `span` into a bar of `len` steps. The span must carry
/// `indicatif.pb_show` to be displayed.
pub fn track(span: &Span, len: usize, msg: &str) {
    let style: ProgressStyle = match ProgressStyle::with_template(PROGRESS_TEMPLATE) {
        Ok(style) => style.tick_strings(TICK_STRINGS),
        Err(_) => ProgressStyle::default_bar(),
    };
    span.pb_set_style(&style);
    span.pb_set_length(len as u64);
    span.pb_set_message(msg);
}

/// Progress callback advancing the bar attached to `span`.
pub fn progress(span: &Span) -> ProgressFn {
    let span: Span = span.clone();
    Box::new(move |_reconciled| span.pb_inc(1))
}
