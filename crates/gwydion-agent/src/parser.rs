//! Line-scanner for free-form ReAct responses.
//!
//! The model's output is scanned line by line. A line opening with a known
//! label ("Thought:", "Action:", "Observation:", case-insensitive) starts or
//! switches the field being filled; a fresh "Thought:" closes the current
//! step and opens the next. Unlabeled lines continue whatever field is open,
//! space-joined. Nothing here ever fails: unexpected input degrades to
//! continuation text, and input with no labels at all yields no steps.

use crate::types::ReasoningStep;

/// The field currently receiving continuation lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OpenField {
    None,
    Thought,
    Action,
    Observation,
}

/// Strip a case-insensitive label prefix, returning the rest of the line.
fn strip_label<'a>(line: &'a str, label: &str) -> Option<&'a str> {
    let prefix = line.get(..label.len())?;
    if prefix.eq_ignore_ascii_case(label) {
        Some(line[label.len()..].trim_start())
    } else {
        None
    }
}

/// Append text to a field, space-joining onto existing content.
fn append(field: &mut String, text: &str) {
    if text.is_empty() {
        return;
    }
    if !field.is_empty() {
        field.push(' ');
    }
    field.push_str(text);
}

/// Parse an LLM response into reasoning steps.
///
/// Step ids are sequential within the response; the trace renumbers them on
/// append. Classification of each step's action is a separate concern — all
/// parsed steps come back with [`ActionKind::Unknown`](crate::ActionKind).
pub fn parse_response(response: &str) -> Vec<ReasoningStep> {
    let mut steps: Vec<ReasoningStep> = Vec::new();
    let mut current: Option<ReasoningStep> = None;
    let mut open = OpenField::None;
    let mut next_id: u32 = 1;

    for line in response.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(rest) = strip_label(line, "thought:") {
            // A new thought closes the previous step
            if let Some(step) = current.take() {
                steps.push(step);
            }
            let mut step = ReasoningStep::new(next_id);
            next_id += 1;
            step.thought = rest.to_string();
            current = Some(step);
            open = OpenField::Thought;
        } else if let Some(rest) = strip_label(line, "action:") {
            let step = current.get_or_insert_with(|| {
                let step = ReasoningStep::new(next_id);
                next_id += 1;
                step
            });
            append(&mut step.action_text, rest);
            open = OpenField::Action;
        } else if let Some(rest) = strip_label(line, "observation:") {
            let step = current.get_or_insert_with(|| {
                let step = ReasoningStep::new(next_id);
                next_id += 1;
                step
            });
            append(&mut step.observation, rest);
            open = OpenField::Observation;
        } else {
            // Unlabeled line: continuation of whichever field is open
            if let Some(step) = current.as_mut() {
                match open {
                    OpenField::Thought => append(&mut step.thought, line),
                    OpenField::Action => append(&mut step.action_text, line),
                    OpenField::Observation => append(&mut step.observation, line),
                    OpenField::None => {}
                }
            }
        }
    }

    if let Some(step) = current.take() {
        steps.push(step);
    }

    steps
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_step() {
        let steps = parse_response("Thought: I should look around\nAction: look");
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].thought, "I should look around");
        assert_eq!(steps[0].action_text, "look");
    }

    #[test]
    fn test_parse_multiple_steps() {
        let steps = parse_response(
            "Thought: t1\nAction: query_kg('keywords','key')\nObservation: found facts\nThought: t2\nAction: take key",
        );
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].thought, "t1");
        assert_eq!(steps[0].observation, "found facts");
        assert_eq!(steps[1].thought, "t2");
        assert_eq!(steps[1].action_text, "take key");
    }

    #[test]
    fn test_parse_case_insensitive_labels() {
        let steps = parse_response("THOUGHT: loud\naction: whisper");
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].thought, "loud");
        assert_eq!(steps[0].action_text, "whisper");
    }

    #[test]
    fn test_parse_continuation_lines_join_open_field() {
        let steps = parse_response(
            "Thought: the chest is locked\nand the key is in the kitchen\nAction: go to\nthe kitchen",
        );
        assert_eq!(steps.len(), 1);
        assert_eq!(
            steps[0].thought,
            "the chest is locked and the key is in the kitchen"
        );
        assert_eq!(steps[0].action_text, "go to the kitchen");
    }

    #[test]
    fn test_parse_action_without_thought_opens_step() {
        let steps = parse_response("Action: look");
        assert_eq!(steps.len(), 1);
        assert!(steps[0].thought.is_empty());
        assert_eq!(steps[0].action_text, "look");
    }

    #[test]
    fn test_parse_leading_unlabeled_lines_ignored() {
        let steps = parse_response("Sure, here is my reasoning:\nThought: okay\nAction: look");
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].thought, "okay");
    }

    #[test]
    fn test_parse_no_labels_yields_no_steps() {
        assert!(parse_response("I just want to chat about the weather.").is_empty());
        assert!(parse_response("").is_empty());
    }

    #[test]
    fn test_parse_blank_lines_skipped() {
        let steps = parse_response("Thought: a\n\n\nAction: b\n\n");
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].action_text, "b");
    }

    #[test]
    fn test_parse_never_panics_on_odd_input() {
        for input in [
            "Thought:",
            "Action:   \nObservation:",
            "thought:no space",
            "Observation: orphan observation",
            "::::",
        ] {
            let _ = parse_response(input);
        }
    }
}
