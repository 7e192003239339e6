use lc_client::{ConsoleEvent, ConsoleSnapshot};
use lc_core::MetricsSnapshot;

const MIB: f64 = 1024.0 * 1024.0;

/// Text to print for an event, if any
pub fn render_event(event: &ConsoleEvent) -> Option<String> {
    match event {
        ConsoleEvent::Line(line) => Some(line.text.clone()),
        // Live lines after the history were already printed as they arrived
        ConsoleEvent::Backfilled { history, .. } => {
            let mut out = format!("* history: {} lines", history.len());
            for line in history {
                out.push('\n');
                out.push_str(&line.text);
            }
            Some(out)
        }
        ConsoleEvent::Connection { connected: true } => Some("* connected".to_string()),
        ConsoleEvent::Connection { connected: false } => Some("* disconnected".to_string()),
        ConsoleEvent::Status(transition) => {
            let activity = if transition.is_active { "active" } else { "inactive" };
            if transition.observed.known() == Some(transition.current) {
                Some(format!("* status: {} ({})", transition.current, activity))
            } else {
                Some(format!(
                    "* status: {} reported, still {} ({})",
                    transition.observed, transition.current, activity
                ))
            }
        }
        ConsoleEvent::Metrics(metrics) => Some(format!("* {}", render_metrics(metrics))),
        ConsoleEvent::ReconnectScheduled { attempt, delay } => Some(format!(
            "* reconnecting in {}ms (attempt {})",
            delay.as_millis(),
            attempt
        )),
        ConsoleEvent::Unrecognized { .. } => None,
    }
}

pub fn render_metrics(metrics: &MetricsSnapshot) -> String {
    let cpu = metrics
        .cpu_percent()
        .map(|cpu| format!("{:.1}%", cpu))
        .unwrap_or_else(|| "-".to_string());

    let memory = match metrics.memory_limit_bytes {
        Some(limit) => format!(
            "{:.1}/{:.1} MiB",
            metrics.memory_bytes as f64 / MIB,
            limit as f64 / MIB
        ),
        None => format!("{:.1} MiB", metrics.memory_bytes as f64 / MIB),
    };

    format!("cpu {} | mem {} | players {}", cpu, memory, metrics.players)
}

pub fn render_snapshot(snapshot: &ConsoleSnapshot) -> String {
    let mut out = format!(
        "* {} | status {} | retries {} | {} lines buffered",
        if snapshot.connected { "connected" } else { "disconnected" },
        snapshot.status,
        snapshot.retry_count,
        snapshot.lines.len()
    );

    let flags = snapshot.flags;
    let mut set = Vec::new();
    if flags.installing {
        set.push("installing");
    }
    if flags.auth_required {
        set.push("auth_required");
    }
    if flags.booted {
        set.push("booted");
    }
    if !set.is_empty() {
        out.push_str(&format!(" | flags {}", set.join(",")));
    }

    if let Some(started_at) = snapshot.started_at {
        out.push_str(&format!(" | up since {}", started_at.to_rfc3339()));
    }

    if let Some(ref metrics) = snapshot.metrics {
        out.push_str("\n* ");
        out.push_str(&render_metrics(metrics));
    }

    out
}
