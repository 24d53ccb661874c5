//! Client Log Component
//!
//! Recent log records kept by the in-memory logger, newest first.

use leptos::prelude::*;
use log::Level;
use rolling_logger::LogRecord;

use crate::config::APP_NAME;

fn visible_lines(records: &[LogRecord], problems_only: bool) -> Vec<String> {
    records
        .iter()
        .rev()
        .filter(|r| !problems_only || r.level <= Level::Warn)
        .map(|r| r.line(APP_NAME))
        .collect()
}

#[component]
pub fn ClientLog() -> impl IntoView {
    let records = RwSignal::new(rolling_logger::recent());
    let problems_only = RwSignal::new(false);
    let lines = Memo::new(move |_| records.with(|r| visible_lines(r, problems_only.get())));

    view! {
        <div class="card">
            <div class="card-header">
                <h3>"Client log"</h3>
                <div class="page-actions">
                    <label>
                        <input
                            type="checkbox"
                            prop:checked=move || problems_only.get()
                            on:change=move |ev| problems_only.set(event_target_checked(&ev))
                        />
                        " Warnings only"
                    </label>
                    <button class="btn btn-small" on:click=move |_| records.set(rolling_logger::recent())>"Refresh"</button>
                </div>
            </div>
            <Show when=move || !lines.with(Vec::is_empty) fallback=|| view! { <p class="empty">"Nothing logged yet"</p> }>
                <pre class="client-log">{move || lines.get().join("\n")}</pre>
            </Show>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Local;

    fn record(level: Level, message: &str) -> LogRecord {
        LogRecord {
            timestamp: Local::now(),
            level,
            target: "core_crm_ui".to_string(),
            message: message.to_string(),
        }
    }

    #[test]
    fn test_newest_first_and_problem_filter() {
        let records = vec![
            record(Level::Info, "[APP] starting"),
            record(Level::Warn, "[KANBAN] move failed"),
            record(Level::Error, "[API] boom"),
        ];

        let all = visible_lines(&records, false);
        assert_eq!(all.len(), 3);
        assert!(all[0].ends_with("[API] boom"));
        assert!(all[2].ends_with("[APP] starting"));

        let problems = visible_lines(&records, true);
        assert_eq!(problems.len(), 2);
        assert!(problems.iter().all(|l| !l.contains("[APP]")));
    }
}
