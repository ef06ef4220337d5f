//! Property-based tests for rust_structured_logger using proptest

use proptest::prelude::*;
use rust_structured_logger::prelude::*;
use rust_structured_logger::{MessageTemplate, OutputTemplate};

fn any_level() -> impl Strategy<Value = LogLevel> {
    prop_oneof![
        Just(LogLevel::Verbose),
        Just(LogLevel::Debug),
        Just(LogLevel::Information),
        Just(LogLevel::Warning),
        Just(LogLevel::Error),
        Just(LogLevel::Fatal),
    ]
}

// ============================================================================
// LogLevel Tests
// ============================================================================

proptest! {
    /// Test that LogLevel string conversions roundtrip correctly
    #[test]
    fn test_log_level_str_roundtrip(level in any_level()) {
        let parsed: LogLevel = level.to_str().parse().unwrap();
        prop_assert_eq!(level, parsed);

        let parsed: LogLevel = level.short_code().parse().unwrap();
        prop_assert_eq!(level, parsed);
    }

    /// Test that ordering follows the numeric severity
    #[test]
    fn test_log_level_ordering(level1 in any_level(), level2 in any_level()) {
        let (val1, val2) = (level1 as u8, level2 as u8);
        prop_assert_eq!(level1 <= level2, val1 <= val2);
        prop_assert_eq!(level1 > level2, val1 > val2);
    }

    /// Test that parsing ignores case
    #[test]
    fn test_log_level_case_insensitive(level in any_level(), use_lower in any::<bool>()) {
        let text = if use_lower {
            level.to_str().to_lowercase()
        } else {
            level.to_str().to_uppercase()
        };
        prop_assert_eq!(text.parse::<LogLevel>().unwrap(), level);
    }

    /// Test that garbage never parses
    #[test]
    fn test_log_level_invalid_parse(invalid in "[0-9 ]{1,8}") {
        prop_assert!(invalid.parse::<LogLevel>().is_err());
    }
}

// ============================================================================
// Pipeline Laws
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// An event reaches the sink exactly when its level passes the minimum
    #[test]
    fn test_level_filter_law(minimum in any_level(), levels in prop::collection::vec(any_level(), 0..20)) {
        let capture = CaptureSink::new();
        let events = capture.handle();
        let logger = Logger::builder().min_level(minimum).write_to(capture).build().unwrap();

        for level in &levels {
            logger.log(*level, "probe", &[]).unwrap();
            prop_assert_eq!(logger.is_enabled(*level), *level >= minimum);
        }

        let expected: Vec<LogLevel> = levels.iter().copied().filter(|l| *l >= minimum).collect();
        let received: Vec<LogLevel> = events.events().iter().map(|e| e.level()).collect();
        prop_assert_eq!(received, expected);
    }

    /// Enrichers never overwrite a property that is already present
    #[test]
    fn test_enricher_add_if_absent(explicit in "[a-z]{1,10}", enriched in "[a-z]{1,10}") {
        let capture = CaptureSink::new();
        let events = capture.handle();
        let logger = Logger::builder()
            .enrich_with(PropertyEnricher::new("Key", enriched.clone()))
            .write_to(capture)
            .build()
            .unwrap();

        logger.log(LogLevel::Information, "{Key}", &[explicit.clone().into()]).unwrap();
        logger.log(LogLevel::Information, "no holes", &[]).unwrap();

        let received = events.events();
        prop_assert_eq!(received[0].property("Key").and_then(|v| v.as_str()), Some(explicit.as_str()));
        prop_assert_eq!(received[1].property("Key").and_then(|v| v.as_str()), Some(enriched.as_str()));
    }

    /// Events from one thread arrive in emission order
    #[test]
    fn test_single_thread_order_preserved(count in 1usize..50) {
        let capture = CaptureSink::new();
        let events = capture.handle();
        let logger = Logger::builder().write_to(capture).build().unwrap();

        for seq in 0..count {
            logger.log(LogLevel::Information, "{Seq}", &[seq.into()]).unwrap();
        }

        let seqs: Vec<i64> = events
            .events()
            .iter()
            .filter_map(|e| e.property("Seq").and_then(|v| v.as_int()))
            .collect();
        prop_assert_eq!(seqs, (0..count as i64).collect::<Vec<_>>());
    }
}

// ============================================================================
// Templates and Sanitization
// ============================================================================

proptest! {
    /// Rendered messages never contain raw control characters
    #[test]
    fn test_rendered_message_is_single_line(template in ".*", arg in ".*") {
        let event = LogEvent::new(
            LogLevel::Information,
            &template,
            &[arg.into()],
            None,
            Properties::new(),
        );
        let rendered = event.rendered_message();
        prop_assert!(!rendered.contains('\n'));
        prop_assert!(!rendered.contains('\r'));
        prop_assert!(!rendered.contains('\t'));
    }

    /// Text without braces renders unchanged
    #[test]
    fn test_plain_text_renders_verbatim(text in "[^{}]*") {
        let template = MessageTemplate::parse(&text);
        prop_assert_eq!(template.render(&Properties::new()), text);
    }

    /// Each bound hole becomes a property holding its argument
    #[test]
    fn test_named_holes_bind_in_order(values in prop::collection::vec("[a-z]{1,6}", 1..5)) {
        let template_text: String = (0..values.len()).map(|i| format!("{{P{}}} ", i)).collect();
        let args: Vec<PropertyValue> = values.iter().map(PropertyValue::from).collect();

        let template = MessageTemplate::parse(&template_text);
        let properties = template.bind(&args);

        prop_assert_eq!(properties.len(), values.len());
        for (i, value) in values.iter().enumerate() {
            let key = format!("P{}", i);
            prop_assert_eq!(properties.get(&key).and_then(|v| v.as_str()), Some(value.as_str()));
        }
    }

    /// Parsing arbitrary input never panics
    #[test]
    fn test_template_parsing_no_panic(text in ".*") {
        let _ = MessageTemplate::parse(&text).render(&Properties::new());
        let _ = OutputTemplate::parse(&text);
    }

    /// Adding a property twice keeps the first value and insertion order
    #[test]
    fn test_properties_first_writer_wins(keys in prop::collection::vec("[A-C]", 1..12)) {
        let mut properties = Properties::new();
        let mut expected_order: Vec<String> = Vec::new();
        for (i, key) in keys.iter().enumerate() {
            let added = properties.add_if_absent(key.clone(), i as i64);
            prop_assert_eq!(added, !expected_order.contains(key));
            if added {
                expected_order.push(key.clone());
            }
        }

        let order: Vec<String> = properties.keys().map(str::to_string).collect();
        prop_assert_eq!(&order, &expected_order);
        for key in &expected_order {
            let first = keys.iter().position(|k| k == key).unwrap() as i64;
            prop_assert_eq!(properties.get(key).and_then(|v| v.as_int()), Some(first));
        }
    }
}
