use alpho_core::scanner::dispatch::ProgressHook;
use alpho_core::sink::ConsoleWriter;
use indicatif::ProgressStyle;
use tracing::Span;
use tracing_indicatif::span_ext::IndicatifSpanExt;
use tracing_indicatif::suspend_tracing_indicatif;

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

pub fn bar_style() -> ProgressStyle {
    ProgressStyle::with_template(
        "{spinner:.blue} [{elapsed_precise}] {bar:36.cyan/blue} {pos:>7}/{len:7} {msg}",
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar())
    .progress_chars("■■□")
    .tick_strings(TICKS)
}

pub fn bytes_style() -> ProgressStyle {
    ProgressStyle::with_template(
        "{spinner:.blue} [{elapsed_precise}] {bar:36.cyan/blue} {bytes:>10}/{total_bytes:10} {msg}",
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar())
    .progress_chars("■■□")
    .tick_strings(TICKS)
}

/// Moves the span's bar to `(dispatched, total)` after every enqueue.
pub fn dispatch_hook(span: Span) -> ProgressHook {
    span.pb_set_style(&bar_style());
    span.pb_set_message("hosts dispatched");
    Box::new(move |dispatched, total| {
        span.pb_set_length(total as u64);
        span.pb_set_position(dispatched as u64);
    })
}

/// Result lines go to stdout with the bar hidden for the duration of the write.
pub fn console_writer() -> ConsoleWriter {
    Box::new(|line| suspend_tracing_indicatif(|| println!("{line}")))
}
