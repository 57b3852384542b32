use roster_core::{valid_age, valid_course, valid_email, valid_id, valid_name};

#[test]
fn valid_id_rejects_empty_and_spaced_ids() {
    assert!(!valid_id(""));
    assert!(!valid_id("s 1"));
    assert!(!valid_id(" s1"));
    assert!(!valid_id("s1 "));

    assert!(valid_id("s1"));
    assert!(valid_id("2024-CS-017"));
    assert!(valid_id("#42"));
}

#[test]
fn valid_name_requires_at_least_one_letter() {
    assert!(!valid_name(""));
    assert!(!valid_name("123"));
    assert!(!valid_name("---"));

    assert!(valid_name("Ada"));
    assert!(valid_name("X Æ A-12"));
    assert!(valid_name("3PO c"));
}

#[test]
fn valid_age_accepts_only_positive_digit_strings() {
    assert!(!valid_age("0"));
    assert!(!valid_age("-5"));
    assert!(!valid_age(""));
    assert!(!valid_age("abc"));
    assert!(!valid_age("5.0"));
    assert!(!valid_age("+5"));
    assert!(!valid_age(" 5"));

    assert!(valid_age("5"));
    assert!(valid_age("0021"));
}

#[test]
fn valid_course_requires_two_characters_after_trimming() {
    assert!(!valid_course(""));
    assert!(!valid_course("C"));
    assert!(!valid_course("  C  "));
    assert!(!valid_course("   "));

    assert!(valid_course("CS"));
    assert!(valid_course(" CS "));
    assert!(valid_course("Mathematics"));
}

#[test]
fn valid_email_requires_one_at_sign_and_a_dot_after_it() {
    assert!(valid_email("a@b.com"));
    assert!(!valid_email("a@b"));
    assert!(!valid_email("a b@c.com"));
    assert!(!valid_email(""));
    assert!(!valid_email("a.b.com"));
    assert!(!valid_email("a@b@c.com"));
    assert!(!valid_email("a.b@com"));
}
