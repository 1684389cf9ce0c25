//! Action matcher - compares one dispatched action with the expected one

use std::fmt::Debug;

use pretty_assertions::Comparison;

use crate::report::AssertionFailure;

/// Compare `actual` against the head of the expected queue.
///
/// `expected` is `None` when the queue was already drained; that can never
/// match. The failure message carries a line diff of both sides.
pub fn match_action<A>(index: usize, actual: &A, expected: Option<&A>) -> Result<(), AssertionFailure>
where
    A: PartialEq + Debug,
{
    let check = format!("dispatch #{} matches expected action", index + 1);
    match expected {
        Some(expected) if actual == expected => Ok(()),
        Some(expected) => Err(AssertionFailure::new(
            check,
            format!(
                "dispatched action differs from expected\n{}",
                Comparison::new(actual, expected)
            ),
        )),
        None => Err(AssertionFailure::new(
            check,
            format!("unexpected action, no more actions were expected: {:?}", actual),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_equal_actions_match() {
        let a = json!({"type": "LOAD", "payload": {"id": 1}});
        assert!(match_action(0, &a, Some(&a.clone())).is_ok());
    }

    #[test]
    fn test_nested_difference_fails() {
        let a = json!({"type": "LOAD", "payload": {"id": 1}});
        let b = json!({"type": "LOAD", "payload": {"id": 2}});
        let failure = match_action(2, &a, Some(&b)).unwrap_err();
        assert_eq!(failure.check, "dispatch #3 matches expected action");
        assert!(failure.message.contains("differs"));
    }

    #[test]
    fn test_drained_queue_fails() {
        let failure = match_action(0, &"LOAD", None).unwrap_err();
        assert!(failure.message.contains("no more actions were expected"));
        assert!(failure.message.contains("LOAD"));
    }
}
