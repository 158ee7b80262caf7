//! Text rendering of the session: one log line per status change or update.
use log::{debug, info};
use tracker_common::series::SymbolSeries;
use tracker_common::{ConnectionStatus, SessionUpdate, TrackerSession};

/// Human-readable status indicator.
pub fn status_line(status: ConnectionStatus) -> &'static str {
    match status {
        ConnectionStatus::Connecting => "Connecting...",
        ConnectionStatus::Connected => "Connected to WebSocket",
        ConnectionStatus::Mock => "Using mock data (WebSocket unavailable)",
        ConnectionStatus::Error => "Connection error - using mock data",
    }
}

/// One line per series: price, change since the previous sample and MA-20.
pub fn series_line(series: &SymbolSeries) -> String {
    let change = series.change_percent();
    let arrow = if change >= 0.0 { '▲' } else { '▼' };
    let ma = series
        .latest_average()
        .map_or_else(|| "-".to_string(), |v| format!("{:.2}", v));
    let label = series.history.last().map_or("-", |s| s.label.as_str());
    format!(
        "{} ${:.2} {} {:.2}% MA20={} samples={} updated={}",
        series.ticker,
        series.price,
        arrow,
        change.abs(),
        ma,
        series.history.len(),
        label
    )
}

/// Renderer callback handed to the session driver.
pub fn render(session: &TrackerSession, update: &SessionUpdate) {
    match update {
        SessionUpdate::StatusChanged { to, .. } => {
            info!("STATUS: {}", status_line(*to));
            for series in session.series() {
                info!("{}", series_line(series));
            }
        }
        SessionUpdate::SampleAppended { ticker } => {
            if let Some(series) = session.get(ticker) {
                info!("{}", series_line(series));
            }
        }
        SessionUpdate::Discarded { reason } => debug!("Dropped message: {}", reason),
        SessionUpdate::Ignored => {}
    }
}
