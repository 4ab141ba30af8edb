//! Domain-specific assertion macros for msgprep harnesses.
//!
//! These wrap `pretty_assertions` and name the message or export slot that
//! broke, so a failing rstest case points straight at the record.

// ---------------------------------------------------------------------------
// Message assertions
// ---------------------------------------------------------------------------

/// Assert the display text of a prepared message.
///
/// ```rust
/// assert_text!(message, "foobar test");
/// ```
#[macro_export]
macro_rules! assert_text {
    ($message:expr, $expected:expr) => {{
        let message: &msgprep_core::PreparedMessage = &$message;
        let expected: &str = $expected;
        if message.text != expected {
            pretty_assertions::assert_eq!(
                message.text,
                expected,
                "assert_text! failed for {} message {:?}",
                message.kind,
                message.id
            );
        }
    }};
}

/// Assert the style list of a prepared message.
///
/// ```rust
/// assert_styles!(message, ["color:red", "", "color: blue"]);
/// ```
#[macro_export]
macro_rules! assert_styles {
    ($message:expr, [$($style:expr),* $(,)?]) => {{
        let message: &msgprep_core::PreparedMessage = &$message;
        let expected: Vec<String> = vec![$($style.to_string()),*];
        pretty_assertions::assert_eq!(
            message.styles,
            expected,
            "assert_styles! failed for message text {:?}",
            message.text
        );
    }};
}

/// Assert that the `n`-th parameter of a prepared message is a front of the
/// given class.
#[macro_export]
macro_rules! assert_front_param {
    ($message:expr, $index:expr, $class:expr) => {{
        let message: &msgprep_core::PreparedMessage = &$message;
        let index: usize = $index;
        match message.parameters.get(index).and_then(|p| p.as_front()) {
            Some(front) => pretty_assertions::assert_eq!(
                front.class_name.as_deref(),
                Some($class),
                "assert_front_param! failed at parameter {}",
                index
            ),
            None => panic!(
                "assert_front_param! failed: parameter {} is not a front.\n  parameters: {:?}",
                index, message.parameters
            ),
        }
    }};
}

// ---------------------------------------------------------------------------
// Error assertions
// ---------------------------------------------------------------------------

/// Assert that a result failed with an unresolvable reference to `actor`.
#[macro_export]
macro_rules! assert_unresolvable {
    ($result:expr, $actor:expr) => {{
        match $result {
            Err(msgprep_core::PipelineError::UnresolvableReference { actor, .. }) => {
                pretty_assertions::assert_eq!(actor.as_str(), $actor)
            }
            Err(other) => panic!("assert_unresolvable! failed: unexpected error {other}"),
            Ok(value) => panic!("assert_unresolvable! failed: got Ok({value:?})"),
        }
    }};
}

/// Assert that a result failed as a malformed record.
#[macro_export]
macro_rules! assert_malformed {
    ($result:expr) => {{
        match $result {
            Err(msgprep_core::PipelineError::MalformedRecord { .. }) => {}
            Err(other) => panic!("assert_malformed! failed: unexpected error {other}"),
            Ok(value) => panic!("assert_malformed! failed: got Ok({value:?})"),
        }
    }};
}

// ---------------------------------------------------------------------------
// Export assertions
// ---------------------------------------------------------------------------

/// Assert that all three export views carry exactly the registry's keys, in
/// registry order.
#[macro_export]
macro_rules! assert_views_match_registry {
    ($exported:expr, $registry:expr) => {{
        let exported: &msgprep_core::Exported = &$exported;
        let registry: &msgprep_core::Registry = &$registry;
        assert!(exported.views_aligned(), "export views are keyed differently");
        pretty_assertions::assert_eq!(
            exported.keys().collect::<Vec<_>>(),
            registry.keys().collect::<Vec<_>>(),
            "export keys differ from registry keys"
        );
    }};
}
