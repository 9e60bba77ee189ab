use report_relay::split::{split, MAX_PARTS};

/// Strips the `part {n}` label line a multi-part chunk carries.
fn strip_label(part: &str) -> &str {
    let (label, rest) = part
        .split_once('\n')
        .expect("multi-part chunk must carry a label line");
    assert!(label.starts_with("part "), "unexpected label: {label}");
    rest
}

#[test]
fn text_within_limit_is_a_single_unmodified_part() {
    let lines = vec!["line one".to_string(), "line two".to_string()];

    let parts = split("Z-Report", &lines, 100);

    assert_eq!(parts, vec!["Z-Report\nline one\nline two".to_string()]);
}

#[test]
fn oversize_text_round_trips_through_labelled_parts() {
    let body: String = "a".repeat(4000);
    let lines = vec![body];
    let max_part_size = 1900;

    let parts = split("T", &lines, max_part_size);

    let combined = format!("T\n{}", "a".repeat(4000));
    let expected_parts = combined.len().div_ceil(max_part_size);
    assert_eq!(parts.len(), expected_parts);
    assert_eq!(parts.len(), 3);

    let reassembled: String = parts.iter().map(|part| strip_label(part)).collect();
    assert_eq!(reassembled, combined);

    assert_eq!(strip_label(&parts[0]).len(), 1900);
    assert_eq!(strip_label(&parts[1]).len(), 1900);
    assert_eq!(strip_label(&parts[2]).len(), 202);
}

#[test]
fn parts_are_labelled_in_order() {
    let lines = vec!["x".repeat(50)];

    let parts = split("T", &lines, 10);

    for (i, part) in parts.iter().enumerate() {
        assert!(
            part.starts_with(&format!("part {}\n", i + 1)),
            "part {i} carries the wrong label: {part:?}"
        );
    }
}

#[test]
fn content_past_the_part_cap_is_truncated() {
    let lines = vec!["y".repeat(500)];

    let parts = split("T", &lines, 10);

    assert_eq!(parts.len(), MAX_PARTS);
    let reassembled: String = parts.iter().map(|part| strip_label(part)).collect();
    let combined = format!("T\n{}", "y".repeat(500));
    assert_eq!(reassembled, &combined[..MAX_PARTS * 10]);
}

#[test]
fn chunking_respects_multibyte_characters() {
    let lines = vec!["é".repeat(30)];

    let parts = split("T", &lines, 10);

    let combined = format!("T\n{}", "é".repeat(30));
    let reassembled: String = parts.iter().map(|part| strip_label(part)).collect();
    assert_eq!(reassembled, combined);
    for part in &parts {
        assert!(strip_label(part).chars().count() <= 10);
    }
}

#[test]
fn empty_report_still_produces_the_title_part() {
    let parts = split("Z-Report", &[], 100);

    assert_eq!(parts, vec!["Z-Report".to_string()]);
}
