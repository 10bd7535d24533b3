//! Matching passes and manual issuance through the contract surface.

mod common;

use common::{balance, contract, reference_market, register};
use reputrade_contract::{Contract, Ledger, MemoryLedger};
use reputrade_types::ErrorKind;

fn token_ids(c: &Contract<MemoryLedger>) -> Vec<String> {
    c.list_tokens()
        .unwrap()
        .into_iter()
        .map(|t| t.id.to_string())
        .collect()
}

#[test]
fn partial_fill_leaves_remainder_resting() {
    let (mut c, _a, _b) = reference_market();
    c.create_order("s", "A", 10, 10, "SELL").unwrap();
    c.create_order("b", "B", 4, 11, "BUY").unwrap();

    let report = c.perform_matching().unwrap();
    assert_eq!(report.tokens.len(), 1);
    assert_eq!(report.resting_asks, 1);
    assert_eq!(report.resting_bids, 0);

    let token = c.get_token("token1").unwrap();
    assert_eq!((token.quantity, token.price), (4, 10));
    assert_eq!(c.get_order("s").unwrap().quantity, 6);
    assert!(!c.order_exists("b").unwrap());
    c.verify_conservation().unwrap();
}

#[test]
fn best_prices_cross_first_and_ids_increase() {
    let mut c = contract();
    register(&mut c, "s1", 60, 1000);
    register(&mut c, "s2", 60, 1000);
    register(&mut c, "b1", 60, 1000);
    register(&mut c, "b2", 60, 1000);
    c.create_order("ask_hi", "s1", 5, 12, "SELL").unwrap();
    c.create_order("ask_lo", "s2", 5, 9, "SELL").unwrap();
    c.create_order("bid_lo", "b1", 5, 12, "BUY").unwrap();
    c.create_order("bid_hi", "b2", 5, 15, "BUY").unwrap();

    let report = c.perform_matching().unwrap();
    assert_eq!(report.tokens.len(), 2);
    assert_eq!(token_ids(&c), ["token1", "token2"]);

    let first = c.get_token("token1").unwrap();
    assert_eq!(first.buyer_id.as_str(), "b2");
    assert_eq!(first.seller_id.as_str(), "s2");
    assert_eq!(first.price, 9);

    let second = c.get_token("token2").unwrap();
    assert_eq!(second.buyer_id.as_str(), "b1");
    assert_eq!(second.seller_id.as_str(), "s1");
    assert_eq!(second.price, 12);

    assert_eq!(c.token_count().unwrap(), 2);
    assert!(c.list_orders().unwrap().is_empty());
    c.verify_conservation().unwrap();
}

#[test]
fn second_pass_is_a_no_op() {
    let (mut c, _a, _b) = reference_market();
    c.create_order("s", "A", 10, 10, "SELL").unwrap();
    c.create_order("b", "B", 10, 12, "BUY").unwrap();
    c.perform_matching().unwrap();
    let before = c.ledger().clone();

    let report = c.perform_matching().unwrap();
    assert!(report.is_empty());
    assert_eq!(c.ledger(), &before);
}

#[test]
fn non_crossing_book_issues_nothing() {
    let (mut c, _a, _b) = reference_market();
    c.create_order("s", "A", 10, 13, "SELL").unwrap();
    c.create_order("b", "B", 10, 12, "BUY").unwrap();

    let report = c.perform_matching().unwrap();
    assert!(report.tokens.is_empty());
    assert_eq!((report.resting_bids, report.resting_asks), (1, 1));
    assert_eq!(c.token_count().unwrap(), 0);
    assert_eq!((balance(&c, "A"), balance(&c, "B")), (1000, 1000));
}

#[test]
fn eligibility_is_rechecked_at_match_time() {
    let (mut c, _a, _b) = reference_market();
    c.create_order("s", "A", 10, 10, "SELL").unwrap();
    c.create_order("b", "B", 10, 12, "BUY").unwrap();

    // Drive A below the threshold after the order was accepted.
    let mut a = c.get_participant("A").unwrap();
    a.reputation = 10;
    let raw = serde_json::to_vec(&a).unwrap();
    c.ledger_mut().put_state("PARTICIPANT_A", raw).unwrap();

    let report = c.perform_matching().unwrap();
    assert!(report.tokens.is_empty());
    assert_eq!(report.ineligible, 1);
    assert!(c.order_exists("s").unwrap());
}

#[test]
fn malformed_and_orphan_orders_are_skipped() {
    let (mut c, _a, _b) = reference_market();
    c.create_order("s", "A", 10, 10, "SELL").unwrap();
    c.create_order("b", "B", 10, 12, "BUY").unwrap();
    c.ledger_mut()
        .put_state("ORDER_junk", b"{not json".to_vec())
        .unwrap();
    let orphan = serde_json::json!({
        "orderID": "orphan",
        "participantID": "ghost",
        "orderType": "BUY",
        "energyAmount": 5,
        "price": 50,
    });
    c.ledger_mut()
        .put_state("ORDER_orphan", serde_json::to_vec(&orphan).unwrap())
        .unwrap();

    let report = c.perform_matching().unwrap();
    assert_eq!(report.tokens.len(), 1);
    assert_eq!(report.scanned, 4);
    assert_eq!(report.malformed, 1);
    assert_eq!(report.owner_missing, 1);
    let token = c.get_token("token1").unwrap();
    assert_eq!(token.buyer_id.as_str(), "B");
}

#[test]
fn self_trade_aborts_the_whole_pass() {
    let (mut c, _a, _b) = reference_market();
    c.create_order("s", "A", 10, 10, "SELL").unwrap();
    c.create_order("b", "A", 10, 12, "BUY").unwrap();
    let before = c.ledger().clone();

    let err = c.perform_matching().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SelfTrade);
    assert_eq!(c.ledger(), &before);
    assert_eq!(c.token_count().unwrap(), 0);
}

#[test]
fn underfunded_cross_aborts_the_whole_pass() {
    let mut c = contract();
    register(&mut c, "S", 50, 1000);
    register(&mut c, "B", 80, 1000);
    register(&mut c, "P", 80, 10);
    c.create_order("s", "S", 10, 10, "SELL").unwrap();
    c.create_order("b", "B", 5, 12, "BUY").unwrap();
    // Deposit 9% of 50 is 4; ok at entry, too small once P spends down.
    c.create_order("p", "P", 5, 11, "BUY").unwrap();
    let mut p = c.get_participant("P").unwrap();
    p.balance = 1;
    c.ledger_mut()
        .put_state("PARTICIPANT_P", serde_json::to_vec(&p).unwrap())
        .unwrap();
    let before = c.ledger().clone();

    let err = c.perform_matching().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InsufficientBalance);
    assert_eq!(c.ledger(), &before);
}

#[test]
fn replicas_agree_on_the_fill_root() {
    let build = || {
        let mut c = contract();
        for (id, rep) in [("s1", 40), ("s2", 90), ("b1", 70), ("b2", 30)] {
            register(&mut c, id, rep, 5000);
        }
        c.create_order("a1", "s1", 7, 10, "SELL").unwrap();
        c.create_order("a2", "s2", 3, 10, "SELL").unwrap();
        c.create_order("x1", "b1", 6, 11, "BUY").unwrap();
        c.create_order("x2", "b2", 6, 11, "BUY").unwrap();
        c
    };
    let (mut left, mut right) = (build(), build());

    let l = left.perform_matching().unwrap();
    let r = right.perform_matching().unwrap();
    assert_eq!(l.fill_root, r.fill_root);
    assert_eq!(l.tokens, r.tokens);
    assert_eq!(left.ledger(), right.ledger());
}

#[test]
fn manual_issuance_with_signatures() {
    let (mut c, a, b) = reference_market();
    c.create_order("s", "A", 10, 10, "SELL").unwrap();
    c.create_order("b", "B", 10, 12, "BUY").unwrap();

    let token = c
        .issue_token("b", "s", Some(&b.sign("token1")), Some(&a.sign("token1")))
        .unwrap();
    assert!(token.buyer_signature.is_some());
    assert!(token.seller_signature.is_some());

    let sig = token.seller_signature.unwrap();
    assert!(c.verify_signature("A", "token1", &sig).unwrap());
    assert!(!c.verify_signature("B", "token1", &sig).unwrap());
    assert!(!c.verify_signature("A", "token2", &sig).unwrap());
}

#[test]
fn manual_issuance_rejects_bad_signature_atomically() {
    let (mut c, a, _b) = reference_market();
    c.create_order("s", "A", 10, 10, "SELL").unwrap();
    c.create_order("b", "B", 10, 12, "BUY").unwrap();
    let before = c.ledger().clone();

    // Seller's signature presented as the buyer's.
    let err = c
        .issue_token("b", "s", Some(&a.sign("token1")), None)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidSignature);
    assert_eq!(c.ledger(), &before);

    let err = c.issue_token("b", "s", Some("zz"), None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidSignature);
    assert_eq!(c.ledger(), &before);
}

#[test]
fn manual_issuance_preconditions() {
    let (mut c, _a, _b) = reference_market();
    c.create_order("s", "A", 10, 13, "SELL").unwrap();
    c.create_order("b", "B", 10, 12, "BUY").unwrap();

    let cases = [
        (c.issue_token("b", "nope", None, None), ErrorKind::NotFound),
        (c.issue_token("s", "b", None, None), ErrorKind::TypeMismatch),
        (c.issue_token("b", "s", None, None), ErrorKind::PriceMismatch),
    ];
    for (result, kind) in cases {
        assert_eq!(result.unwrap_err().kind(), kind);
    }
    assert_eq!(c.token_count().unwrap(), 0);
}

#[test]
fn order_entry_rules() {
    let (mut c, _a, _b) = reference_market();
    register(&mut c, "low", 10, 1000);
    register(&mut c, "poor", 80, 0);

    let cases = [
        (c.create_order("o", "A", 10, 10, "HOLD"), ErrorKind::InvalidArgument),
        (c.create_order("o", "A", 0, 10, "BUY"), ErrorKind::InvalidArgument),
        (c.create_order("o", "A", 10, -1, "BUY"), ErrorKind::InvalidArgument),
        (c.create_order("o", "ghost", 1, 1, "BUY"), ErrorKind::NotFound),
        (c.create_order("o", "low", 1, 1, "BUY"), ErrorKind::ReputationTooLow),
        (c.create_order("o", "poor", 10, 10, "SELL"), ErrorKind::InsufficientBalance),
    ];
    for (result, kind) in cases {
        assert_eq!(result.unwrap_err().kind(), kind);
    }
    assert_eq!(c.order_count().unwrap(), 0);

    c.create_order("o", "A", 1, 1, "BUY").unwrap();
    let dup = c.create_order("o", "B", 1, 1, "SELL").unwrap_err();
    assert_eq!(dup.kind(), ErrorKind::DuplicateEntity);
    assert_eq!(c.order_count().unwrap(), 1);
}

#[test]
fn reinitialising_keeps_token_ids_unique() {
    let (mut c, _a, _b) = reference_market();
    c.create_order("s1", "A", 10, 10, "SELL").unwrap();
    c.create_order("b1", "B", 10, 12, "BUY").unwrap();
    let first = c.perform_matching().unwrap();

    c.init_ledger().unwrap();
    assert_eq!(c.token_count().unwrap(), 1);
    assert_eq!(c.order_count().unwrap(), 2);

    c.create_order("s2", "A", 5, 10, "SELL").unwrap();
    c.create_order("b2", "B", 5, 10, "BUY").unwrap();
    let second = c.perform_matching().unwrap();

    assert_ne!(first.tokens, second.tokens);
    assert_eq!(token_ids(&c), ["token1", "token2"]);
    assert_eq!(c.get_token("token1").unwrap().quantity, 10);
    c.verify_conservation().unwrap();
}
