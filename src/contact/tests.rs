use super::*;

#[test]
fn test_inquiry_mints_req_id() {
    let inquiry = ContactInquiry::new("Acme Corp", "ops@acme.example", "We need an audit.")
        .expect("valid inquiry");

    assert!(inquiry.id.starts_with("REQ-"));
    assert_eq!(inquiry.id.len(), 10);
    assert_eq!(inquiry.company, "Acme Corp");
}

#[test]
fn test_inquiry_validation() {
    assert_eq!(
        ContactInquiry::new("  ", "ops@acme.example", "hello").unwrap_err(),
        ValidationError::MissingCompany
    );
    assert_eq!(
        ContactInquiry::new("Acme", "not-an-email", "hello").unwrap_err(),
        ValidationError::InvalidEmail
    );
    assert_eq!(
        ContactInquiry::new("Acme", "ops@acme.example", "   ").unwrap_err(),
        ValidationError::EmptyMessage
    );

    let long = "x".repeat(5_001);
    assert_eq!(
        ContactInquiry::new("Acme", "ops@acme.example", &long).unwrap_err(),
        ValidationError::MessageTooLong { limit: 5_000 }
    );
}

#[test]
fn test_sanitize_strips_markup() {
    assert_eq!(sanitize("<b>bold</b> move"), "bold move");
    assert_eq!(sanitize("  plain text  "), "plain text");
    assert_eq!(sanitize("<script>alert(1)</script>"), "alert(1)");
}

#[test]
fn test_message_is_sanitized_on_construction() {
    let inquiry =
        ContactInquiry::new("Acme", "ops@acme.example", "<p>Please call us.</p>").expect("valid");
    assert_eq!(inquiry.message, "Please call us.");

    // a message that is only markup sanitizes down to empty
    assert_eq!(
        ContactInquiry::new("Acme", "ops@acme.example", "<br><hr>").unwrap_err(),
        ValidationError::EmptyMessage
    );
}

#[test]
fn test_ledger_appends_in_order() {
    let ledger = InquiryLedger::in_memory();

    let a = ContactInquiry::new("Acme", "a@acme.example", "first").expect("valid");
    let b = ContactInquiry::new("Beta", "b@beta.example", "second").expect("valid");
    ledger.append(a.clone()).expect("append");
    ledger.append(b.clone()).expect("append");

    assert_eq!(ledger.list(), vec![a, b]);
}

#[test]
fn test_ledger_round_trips_through_disk() {
    let dir = tempfile::tempdir().expect("tempdir");

    let inquiry = ContactInquiry::new("Acme", "ops@acme.example", "hello").expect("valid");
    {
        let ledger = InquiryLedger::open(dir.path()).expect("open");
        ledger.append(inquiry.clone()).expect("append");
    }

    let reopened = InquiryLedger::open(dir.path()).expect("reopen");
    assert_eq!(reopened.list(), vec![inquiry]);
}

#[test]
fn test_ledger_open_with_missing_file_starts_empty() {
    let dir = tempfile::tempdir().expect("tempdir");
    let ledger = InquiryLedger::open(dir.path()).expect("open");
    assert!(ledger.is_empty());
}

#[test]
fn test_ledger_rejects_corrupt_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join(INQUIRY_LEDGER_FILENAME), b"{broken").expect("write");

    let err = InquiryLedger::open(dir.path()).expect_err("corrupt ledger");
    assert!(matches!(err, LedgerError::Corrupt { .. }));
}
