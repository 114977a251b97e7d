use accounting_core::accounts::{Account, AccountGroup, AccountGroupType};
use accounting_core::info::CreditInfo;
use accounting_core::posting::{
    calculate_warnings_for_collection, PostingLine, PostingWarningReason,
};
use accounting_core::Calculable;
use chrono::NaiveDate;
use rust_decimal_macros::dec;

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, day).unwrap()
}

fn overdrawn_account() -> Account {
    let group = AccountGroup::new(1, "Bank accounts", AccountGroupType::Assets).unwrap();
    let mut account = Account::new(1, "1010", "Bank", group).unwrap();
    account
        .add_credit_info(CreditInfo::new(2025, 3, dec!(200)).unwrap())
        .unwrap();
    account
        .add_posting_line(
            PostingLine::new(1, date(5), "deposit", "1010", dec!(100), dec!(0), 1).unwrap(),
        )
        .unwrap();
    account
        .add_posting_line(
            PostingLine::new(1, date(10), "rent", "1010", dec!(0), dec!(450), 2).unwrap(),
        )
        .unwrap();
    account
}

#[tokio::test]
async fn overdraft_line_is_flagged_once() {
    let account = overdrawn_account();
    let status_date = date(31).and_hms_opt(0, 0, 0).unwrap();
    let calculated = account.calculate(status_date).await.unwrap();

    let warnings = calculate_warnings_for_collection(calculated.posting_lines());
    assert_eq!(warnings.len(), 1);

    let warning = warnings.ordered()[0];
    assert_eq!(warning.reason(), PostingWarningReason::CreditLimitExceeded);
    assert_eq!(warning.account_number(), "1010");
    // Balance after the rent line is -350 against a 200 limit.
    assert_eq!(warning.amount(), dec!(150));
    assert_eq!(warning.posting_line().posting_date(), date(10));
}

#[tokio::test]
async fn warning_evaluation_never_triggers_recalculation() {
    let account = overdrawn_account();

    // Uncalculated lines carry no snapshots, so nothing can be evaluated.
    let warnings = calculate_warnings_for_collection(account.posting_lines());
    assert!(warnings.is_empty());
}

#[tokio::test]
async fn warnings_are_ordered_like_the_ledger() {
    let group = AccountGroup::new(1, "Bank accounts", AccountGroupType::Assets).unwrap();
    let mut account = Account::new(1, "1010", "Bank", group).unwrap();
    account
        .add_credit_info(CreditInfo::new(2025, 3, dec!(0)).unwrap())
        .unwrap();
    account
        .add_posting_line(
            PostingLine::new(1, date(10), "second", "1010", dec!(0), dec!(20), 2).unwrap(),
        )
        .unwrap();
    account
        .add_posting_line(
            PostingLine::new(1, date(10), "first", "1010", dec!(0), dec!(30), 1).unwrap(),
        )
        .unwrap();

    let status_date = date(31).and_hms_opt(0, 0, 0).unwrap();
    let calculated = account.calculate(status_date).await.unwrap();
    let warnings = calculate_warnings_for_collection(calculated.posting_lines());

    assert_eq!(warnings.len(), 2);
    let ordered = warnings.ordered();
    assert_eq!(ordered[0].posting_line().details(), "first");
    assert_eq!(ordered[0].amount(), dec!(30));
    assert_eq!(ordered[1].posting_line().details(), "second");
    assert_eq!(ordered[1].amount(), dec!(50));
}
