//! Replay of recorded input scripts.
//!
//! A script is a JSON array of timestamped events. Replay drives a
//! [`ClickDisambiguator`] on a simulated clock: before each event, every
//! deferred action whose deadline has passed is fired, so a run is
//! deterministic and takes no wall-clock time.
//!
//! ```json
//! [
//!   { "at_ms": 0,   "event": { "type": "key_down", "key": "Backspace" } },
//!   { "at_ms": 10,  "event": { "type": "mouse_down", "button": 0 } },
//!   { "at_ms": 20,  "event": { "type": "click", "detail": 1, "target": { ... } } }
//! ]
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};

use serde::{Deserialize, Serialize};
use tokio::time::{Duration, Instant};

use crate::click::{
    ActionExecutor, ClickConfig, ClickDisambiguator, ClickEvent, ClickTarget, MouseButton,
    ResolvedAction,
};

/// One input event in a script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReplayEvent {
    KeyDown {
        key: String,
    },
    KeyUp {
        key: String,
    },
    Blur,
    MouseDown {
        #[serde(default)]
        button: u8,
    },
    Click {
        detail: u32,
        #[serde(default)]
        button: u8,
        #[serde(default)]
        shift_key: bool,
        target: ClickTarget,
    },
}

/// An event and its offset from the start of the script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayStep {
    pub at_ms: u64,
    pub event: ReplayEvent,
}

/// Counters from one replay run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayReport {
    pub events: usize,
    pub clicks: usize,
    /// Clicks whose default handling was suppressed.
    pub prevented: usize,
    /// Actions that reached the executor, immediate or deferred.
    pub executed: usize,
}

pub fn parse_script(json: &str) -> Result<Vec<ReplayStep>, serde_json::Error> {
    serde_json::from_str(json)
}

/// Run `steps` through a fresh disambiguator, in `at_ms` order.
pub fn replay<E: ActionExecutor>(
    steps: &[ReplayStep],
    config: ClickConfig,
    executor: &E,
) -> ReplayReport {
    let start = Instant::now();
    let mut clicks = ClickDisambiguator::new(config);
    let mut report = ReplayReport::default();

    let mut ordered: Vec<&ReplayStep> = steps.iter().collect();
    ordered.sort_by_key(|step| step.at_ms);

    for step in ordered {
        let at = start + Duration::from_millis(step.at_ms);
        report.executed += fire_until(&mut clicks, Some(at), executor);
        report.events += 1;

        match &step.event {
            ReplayEvent::KeyDown { key } => clicks.on_key_down(key),
            ReplayEvent::KeyUp { key } => clicks.on_key_up(key),
            ReplayEvent::Blur => clicks.on_blur(),
            ReplayEvent::MouseDown { button } => {
                clicks.on_mouse_down(MouseButton::from_dom(*button), at)
            }
            ReplayEvent::Click {
                detail,
                button,
                shift_key,
                target,
            } => {
                let event = ClickEvent {
                    detail: *detail,
                    button: MouseButton::from_dom(*button),
                    shift_key: *shift_key,
                    at,
                };
                let outcome = clicks.on_click(&event, target);
                report.clicks += 1;
                if outcome.prevent_default {
                    report.prevented += 1;
                }
                if let Some(action) = &outcome.fired {
                    executor.execute(action);
                    report.executed += 1;
                }
            }
        }
    }

    report.executed += fire_until(&mut clicks, None, executor);
    report
}

/// Fire deferred actions due at or before `until` (all of them for `None`).
fn fire_until<E: ActionExecutor>(
    clicks: &mut ClickDisambiguator,
    until: Option<Instant>,
    executor: &E,
) -> usize {
    let mut fired = 0;
    while let Some(deadline) = clicks.next_deadline() {
        if until.is_some_and(|until| deadline > until) {
            break;
        }
        if let Some(action) = clicks.fire_due(deadline) {
            executor.execute(&action);
            fired += 1;
        }
    }
    fired
}

/// Prints each resolved action as one JSON line on stdout.
#[derive(Debug, Default)]
pub struct PrintingExecutor {
    printed: AtomicUsize,
}

impl PrintingExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn printed(&self) -> usize {
        self.printed.load(Ordering::Relaxed)
    }
}

impl ActionExecutor for PrintingExecutor {
    fn execute(&self, action: &ResolvedAction) {
        match serde_json::to_string(action) {
            Ok(line) => println!("{}", line),
            Err(err) => tracing::warn!("Failed to serialize action: {}", err),
        }
        self.printed.fetch_add(1, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::RecordingExecutor;
    use crate::click::{ClickAction, ModifierRequirement};

    const TARGET: &str = r#"{
        "message": {"id": "5", "channel_id": "6", "author_id": "7", "content": "hi", "own": true},
        "channel": {"id": "6", "guild_id": "8",
                    "permissions": {"send_messages": true, "add_reactions": true}}
    }"#;

    fn click(at_ms: u64, detail: u32) -> Vec<ReplayStep> {
        let target: ClickTarget = serde_json::from_str(TARGET).unwrap();
        vec![
            ReplayStep {
                at_ms,
                event: ReplayEvent::MouseDown { button: 0 },
            },
            ReplayStep {
                at_ms,
                event: ReplayEvent::Click {
                    detail,
                    button: 0,
                    shift_key: false,
                    target,
                },
            },
        ]
    }

    #[test]
    fn test_parse_script() {
        let json = format!(
            r#"[
                {{"at_ms": 0, "event": {{"type": "key_down", "key": "Backspace"}}}},
                {{"at_ms": 5, "event": {{"type": "blur"}}}},
                {{"at_ms": 10, "event": {{"type": "click", "detail": 1, "target": {}}}}}
            ]"#,
            TARGET
        );
        let steps = parse_script(&json).unwrap();
        assert_eq!(steps.len(), 3);
        assert_eq!(steps[1].event, ReplayEvent::Blur);
        assert!(matches!(
            steps[2].event,
            ReplayEvent::Click {
                detail: 1,
                button: 0,
                shift_key: false,
                ..
            }
        ));
    }

    #[test]
    fn test_replay_fires_deferred_at_end() {
        let executor = RecordingExecutor::new();
        let config = ClickConfig::default()
            .with_single(ClickAction::CopyId, ModifierRequirement::None);

        let report = replay(&click(0, 1), config, &executor);

        assert_eq!(report.clicks, 1);
        assert_eq!(report.prevented, 0);
        assert_eq!(report.executed, 1);
        assert_eq!(executor.actions(), vec![ClickAction::CopyId]);
    }

    #[test]
    fn test_replay_triple_click() {
        let executor = RecordingExecutor::new();
        let mut steps = click(0, 1);
        steps.extend(click(90, 2));
        steps.extend(click(180, 3));

        let report = replay(&steps, ClickConfig::default(), &executor);

        assert_eq!(executor.actions(), vec![ClickAction::React]);
        assert_eq!(report.prevented, 1);
        assert_eq!(report.events, 6);
    }

    #[test]
    fn test_replay_orders_steps() {
        let executor = RecordingExecutor::new();
        let mut steps = click(500, 1);
        steps.insert(
            0,
            ReplayStep {
                at_ms: 600,
                event: ReplayEvent::KeyDown {
                    key: "Backspace".to_string(),
                },
            },
        );
        steps.insert(
            0,
            ReplayStep {
                at_ms: 100,
                event: ReplayEvent::KeyDown {
                    key: "Backspace".to_string(),
                },
            },
        );

        replay(&steps, ClickConfig::default(), &executor);

        // Backspace was down at 100ms, before the click at 500ms
        assert_eq!(executor.actions(), vec![ClickAction::Delete]);
    }
}
