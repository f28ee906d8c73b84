use reservation_form_server::form::layout::Field;
use reservation_form_server::form::marks::{
    class_mark, resolve_marks, resolve_payment_line, tier_mark, CategorySelection, RoomClass,
    RoomTier, CLASS_MARKS, NOT_PAID_BY_GUEST, PAID_BY_GUEST, TIER_MARKS,
};
use reservation_form_server::reservation::ResolvedPayment;

#[test]
fn test_five_tier_codes_each_activate_one_mark() {
    let expected = [
        ("ES-A", (260.0, 483.0)),
        ("ES-B", (260.0, 465.0)),
        ("BR-A", (480.0, 482.0)),
        ("BR-B1", (480.0, 462.0)),
        ("BR-B2", (480.0, 445.0)),
    ];
    for (code, (x, y)) in expected {
        let marks = resolve_marks(Some(code));
        let tier_marks: Vec<_> = marks
            .iter()
            .filter(|(field, _)| *field == Field::TierMark)
            .collect();
        assert_eq!(tier_marks.len(), 1, "category {}", code);
        assert_eq!((tier_marks[0].1.x, tier_marks[0].1.y), (x, y));
    }
}

#[test]
fn test_class_marks_are_mutually_exclusive() {
    for category in ["ES-A", "ES-B", "ES-anything"] {
        let marks = resolve_marks(Some(category));
        assert_eq!(marks[0], (Field::ClassMark, class_mark(RoomClass::ExecutiveSuite)));
        assert!(!marks.contains(&(Field::ClassMark, class_mark(RoomClass::BusinessRoom))));
    }
    for category in ["BR-A", "BR-B1", "BR-B2"] {
        let marks = resolve_marks(Some(category));
        assert_eq!(marks[0], (Field::ClassMark, class_mark(RoomClass::BusinessRoom)));
        assert!(!marks.contains(&(Field::ClassMark, class_mark(RoomClass::ExecutiveSuite))));
    }
}

#[test]
fn test_non_matching_categories() {
    for category in ["", "DELUXE", "ES", "BR-C", "es-a", " ES-A"] {
        let selection = CategorySelection::resolve(Some(category));
        assert_eq!(selection.tier, None, "category {:?}", category);
    }
    assert!(resolve_marks(Some("SUITE")).is_empty());
    assert!(resolve_marks(None).is_empty());
}

#[test]
fn test_tier_codes_parse() {
    assert_eq!("BR-B2".parse::<RoomTier>(), Ok(RoomTier::BusinessB2));
    assert!("BR-B3".parse::<RoomTier>().is_err());
    assert_eq!(RoomTier::ExecutiveB.code(), "ES-B");
}

#[test]
fn test_mark_tables_cover_every_variant() {
    assert_eq!(CLASS_MARKS.len(), RoomClass::ALL.len());
    assert_eq!(TIER_MARKS.len(), RoomTier::ALL.len());
    for tier in RoomTier::ALL {
        assert!(tier_mark(tier).glyph_mark);
    }
}

#[test]
fn test_payment_line_yes_only_for_guest() {
    let cases = [
        (Some("GUEST"), PAID_BY_GUEST),
        (Some("OFFICE"), NOT_PAID_BY_GUEST),
        (Some("guest"), NOT_PAID_BY_GUEST),
        (None, NOT_PAID_BY_GUEST),
    ];
    for (source, label) in cases {
        let line = resolve_payment_line(&ResolvedPayment {
            source: source.map(str::to_string),
            source_name: None,
        });
        assert_eq!(line.label, label, "source {:?}", source);
    }
}

#[test]
fn test_source_name_only_when_someone_else_pays() {
    let line = resolve_payment_line(&ResolvedPayment {
        source: Some("PROJECT".to_string()),
        source_name: Some("DST Grant".to_string()),
    });
    assert_eq!(line.source_name.as_deref(), Some("DST Grant"));

    let line = resolve_payment_line(&ResolvedPayment {
        source: Some("PROJECT".to_string()),
        source_name: None,
    });
    assert_eq!(line.source_name, None);
}
