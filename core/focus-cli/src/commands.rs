//! Subcommand implementations. Output goes to the supplied writer so tests can
//! capture it; diagnostics go through `tracing`.

use std::io::{BufRead, Write};
use std::thread;

use chrono::Utc;
use focus_core::{
    rating, CompletedSession, FocusStatus, Monitor, MonitorConfig, SessionRecord, SessionStore,
    Statistics,
};

use crate::signal::{Control, LineSignalSource, ReportedFaceDetector};

fn emit(out: &mut impl Write, line: &str) -> Result<(), String> {
    writeln!(out, "{}", line).map_err(|e| format!("Failed to write output: {}", e))
}

/// Formats seconds as `12m 5s`.
pub fn format_duration(secs: u64) -> String {
    format!("{}m {}s", secs / 60, secs % 60)
}

pub fn init(store: &SessionStore, out: &mut impl Write) -> Result<(), String> {
    emit(out, &format!("Session log ready at {}", store.path().display()))
}

/// Runs one monitored session fed by `reader`. Returns the saved record, or
/// None if the session was paused (discarded).
pub fn monitor(
    store: &SessionStore,
    config: MonitorConfig,
    reader: impl BufRead,
    out: &mut impl Write,
) -> Result<Option<SessionRecord>, String> {
    let interval = config.poll_interval();
    let mut monitor = Monitor::new(
        LineSignalSource::new(reader),
        ReportedFaceDetector,
        config,
    );

    monitor.start(Utc::now())?;
    emit(out, "▶ Session started. Keep your face visible.")?;

    let mut last_status: Option<FocusStatus> = None;
    loop {
        let now = Utc::now();
        if monitor.max_duration_reached(now) {
            tracing::info!("Maximum session duration reached; ending session");
            emit(out, "⏰ Maximum session duration reached.")?;
            break;
        }

        let snapshot = monitor.poll(now)?;

        match monitor.source_mut().take_control() {
            Some(Control::Pause) => {
                monitor.pause()?;
                emit(out, "⏸ Session paused. Progress was not saved.")?;
                return Ok(None);
            }
            Some(Control::End) => break,
            None => {}
        }

        if let Some(snapshot) = snapshot {
            if snapshot.alert_raised {
                emit(out, "⚠️  DISTRACTION DETECTED! Please refocus on your studies!")?;
            }
            if last_status != Some(snapshot.status) {
                emit(
                    out,
                    &format!(
                        "[{}] {} │ distractions {} │ focus score {}%",
                        format_duration(snapshot.elapsed_secs),
                        snapshot.status.label(),
                        snapshot.distraction_count,
                        snapshot.focus_score
                    ),
                )?;
                last_status = Some(snapshot.status);
            }
        }

        if !monitor.source_open() {
            break;
        }
        if !interval.is_zero() {
            thread::sleep(interval);
        }
    }

    let completed = monitor.end(Utc::now())?;
    let summary = session_summary(&completed);
    match store.append(completed) {
        Ok(record) => {
            emit(out, &format!("✅ Session saved! {}", summary))?;
            Ok(Some(record))
        }
        Err(err) => {
            // The session is gone from memory; show it before failing.
            emit(out, &format!("❌ Session could not be saved. {}", summary))?;
            Err(err.into())
        }
    }
}

fn session_summary(completed: &CompletedSession) -> String {
    format!(
        "Duration: {}, Distractions: {}, Score: {}% ({})",
        format_duration(completed.duration),
        completed.distractions,
        completed.focus_score,
        rating(completed.focus_score)
    )
}

pub fn stats(store: &SessionStore, out: &mut impl Write) -> Result<(), String> {
    let Statistics {
        total_sessions,
        total_study_time,
        total_distractions,
        avg_session_duration,
        avg_focus_score,
    } = store.statistics()?;

    emit(out, &format!("Total sessions:     {}", total_sessions))?;
    emit(
        out,
        &format!("Total study time:   {} min", total_study_time / 60),
    )?;
    emit(out, &format!("Total distractions: {}", total_distractions))?;
    emit(
        out,
        &format!(
            "Avg session:        {}",
            format_duration(avg_session_duration.round() as u64)
        ),
    )?;
    if total_sessions == 0 {
        return emit(out, &format!("Avg focus score:    {:.1}%", avg_focus_score));
    }
    emit(
        out,
        &format!(
            "Avg focus score:    {:.1}% ({})",
            avg_focus_score,
            rating(avg_focus_score.round() as u32)
        ),
    )
}

pub fn history(store: &SessionStore, today: bool, out: &mut impl Write) -> Result<(), String> {
    let sessions = if today {
        store.today_sessions()?
    } else {
        store.all_sessions()?
    };

    if sessions.is_empty() {
        return emit(
            out,
            "No study sessions recorded yet. Start your first session to see analytics!",
        );
    }

    emit(
        out,
        "  id │ date       │ time     │ duration │ distractions │ score │ rating",
    )?;
    for s in &sessions {
        emit(
            out,
            &format!(
                "{:>4} │ {} │ {} │ {:>8} │ {:>12} │ {:>4}% │ {}",
                s.id,
                s.date,
                s.time,
                format_duration(s.duration),
                s.distractions,
                s.focus_score,
                rating(s.focus_score)
            ),
        )?;
    }
    Ok(())
}

pub fn clear(store: &SessionStore, confirmed: bool, out: &mut impl Write) -> Result<(), String> {
    if !confirmed {
        return emit(
            out,
            "Refusing to clear all session data without --yes (this cannot be undone).",
        );
    }
    store.clear()?;
    emit(out, "Data cleared!")
}
