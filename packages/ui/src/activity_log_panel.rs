//! Collapsible view of the session [`ActivityLog`](crate::ActivityLog).

use dioxus::prelude::*;

use crate::activity_log::{use_activity_log, LogEntry, LogLevel};

#[component]
pub fn ActivityLogPanel() -> Element {
    let mut log = use_activity_log();
    if !log().visible {
        return rsx! {};
    }

    let entries = log().entries.clone();
    let empty = entries.is_empty();

    rsx! {
        div {
            class: "activity-log-panel",
            div {
                class: "activity-log-header",
                span { "Session activity" }
                button {
                    disabled: empty,
                    onclick: move |_| log.write().entries.clear(),
                    "Clear"
                }
            }
            if empty {
                p { class: "activity-log-empty", "Nothing yet. Sign in to get started." }
            }
            ul {
                class: "activity-log-entries",
                for entry in entries.into_iter().rev() {
                    ActivityLogRow { entry: entry }
                }
            }
        }
    }
}

#[component]
fn ActivityLogRow(entry: LogEntry) -> Element {
    let level = entry.level.css_class();
    let tag = entry.level.tag();

    rsx! {
        li {
            class: "activity-log-entry {level}",
            span { class: "activity-log-time", "{entry.timestamp}" }
            span { class: "activity-log-tag", " [{tag}]" }
            span { " {entry.message}" }
        }
    }
}

/// Shows or hides the panel; the label counts failures separately.
#[component]
pub fn ActivityLogToggle() -> Element {
    let mut log = use_activity_log();
    let visible = log().visible;
    let count = log().entries.len();
    let errors = log().error_count();

    let label = match (visible, errors) {
        (true, _) => "Hide activity".to_string(),
        (false, 0) => format!("Show activity ({count})"),
        (false, n) => format!("Show activity ({count}, {n} failed)"),
    };

    rsx! {
        button {
            class: if errors > 0 { "activity-log-toggle has-errors" } else { "activity-log-toggle" },
            onclick: move |_| log.write().visible = !visible,
            "{label}"
        }
    }
}

/// Latest acknowledgment, shown inline in place of a browser alert.
#[component]
pub fn LatestNotice() -> Element {
    let log = use_activity_log();
    let Some(entry) = log().latest().cloned() else {
        return rsx! {};
    };
    // Failures already show in the session error banner.
    if entry.level == LogLevel::Error {
        return rsx! {};
    }

    rsx! {
        div {
            class: match entry.level {
                LogLevel::Warning => "session-notice warning",
                _ => "session-notice",
            },
            "{entry.message}"
        }
    }
}
