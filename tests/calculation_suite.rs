use accounting_core::accounts::{
    Account, AccountCollection, AccountGroup, AccountGroupType, BudgetAccount,
    BudgetAccountGroup, ContactAccount, ContactAccountCollection,
};
use accounting_core::info::{
    BudgetInfo, BudgetInfoCollection, ContactInfo, CreditInfo, CreditInfoCollection,
};
use accounting_core::posting::{PostingLine, PostingLineCollection};
use accounting_core::{Calculable, DomainError};
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    date(year, month, day).and_hms_opt(hour, minute, 0).unwrap()
}

fn asset_group() -> AccountGroup {
    AccountGroup::new(1, "Bank accounts", AccountGroupType::Assets).unwrap()
}

fn bank_account(number: &str, lines: &[(NaiveDate, Decimal, Decimal, i32)]) -> Account {
    let mut account = Account::new(1, number, format!("Account {number}"), asset_group()).unwrap();
    account
        .add_credit_info(CreditInfo::new(2025, 3, dec!(500)).unwrap())
        .unwrap();
    account
        .add_credit_info(CreditInfo::new(2025, 4, dec!(500)).unwrap())
        .unwrap();
    for (posting_date, debit, credit, sort_order) in lines {
        let line = PostingLine::new(
            1,
            *posting_date,
            "posting",
            number,
            *debit,
            *credit,
            *sort_order,
        )
        .unwrap();
        account.add_posting_line(line).unwrap();
    }
    account
}

#[tokio::test]
async fn calculation_is_idempotent_for_the_same_calendar_day() {
    let account = bank_account("1010", &[(date(2025, 3, 10), dec!(100), dec!(0), 1)]);

    let first = account.calculate(at(2025, 3, 31, 9, 30)).await.unwrap();
    let second = first.calculate(at(2025, 3, 31, 23, 59)).await.unwrap();

    assert_eq!(first.status_date(), Some(date(2025, 3, 31)));
    assert_eq!(second.status_date(), first.status_date());
    assert_eq!(second.values_at_status_date(), first.values_at_status_date());
    assert_eq!(second.posting_lines(), first.posting_lines());
}

#[tokio::test]
async fn time_of_day_is_truncated_exactly_once() {
    let account = bank_account("1010", &[(date(2025, 3, 10), dec!(100), dec!(0), 1)]);

    let morning = account.calculate(at(2025, 3, 15, 8, 0)).await.unwrap();
    let evening = account.calculate(at(2025, 3, 15, 22, 45)).await.unwrap();

    assert_eq!(morning.status_date(), evening.status_date());
    assert_eq!(
        morning.values_at_status_date(),
        evening.values_at_status_date()
    );
}

#[tokio::test]
async fn earlier_snapshots_survive_later_calculations() {
    let account = bank_account(
        "1010",
        &[
            (date(2025, 3, 10), dec!(100), dec!(0), 1),
            (date(2025, 4, 5), dec!(0), dec!(30), 2),
        ],
    );

    let march = account.calculate(at(2025, 3, 31, 12, 0)).await.unwrap();
    let march_balance = march.values_at_status_date().balance;

    let april = march.calculate(at(2025, 4, 30, 12, 0)).await.unwrap();

    assert_eq!(march.status_date(), Some(date(2025, 3, 31)));
    assert_eq!(march.values_at_status_date().balance, march_balance);
    assert_eq!(april.values_at_status_date().balance, dec!(70));
}

#[tokio::test]
async fn recalculating_to_an_earlier_date_clears_out_of_range_snapshots() {
    let account = bank_account(
        "1010",
        &[
            (date(2025, 3, 10), dec!(100), dec!(0), 1),
            (date(2025, 4, 5), dec!(0), dec!(300), 2),
        ],
    );

    let april = account.calculate(at(2025, 4, 30, 12, 0)).await.unwrap();
    assert!(april.posting_lines().ordered()[1].account_values().is_some());

    let march = april.calculate(at(2025, 3, 31, 12, 0)).await.unwrap();
    let lines = march.posting_lines().ordered();

    assert_eq!(lines[0].account_values().unwrap().balance, dec!(100));
    assert!(lines[1].account_values().is_none());
}

#[tokio::test]
async fn budget_account_recalculation_clears_out_of_range_snapshots() {
    let group = BudgetAccountGroup::new(10, "Operations").unwrap();
    let mut account = BudgetAccount::new(1, "B10", "Sales", group).unwrap();
    account
        .add_budget_info(BudgetInfo::new(2025, 3, dec!(1000), dec!(0)).unwrap())
        .unwrap();
    account
        .add_budget_info(BudgetInfo::new(2025, 4, dec!(800), dec!(0)).unwrap())
        .unwrap();
    for (posting_date, sort_order) in [(date(2025, 3, 12), 1), (date(2025, 4, 3), 2)] {
        let line = PostingLine::new(1, posting_date, "sale", "1010", dec!(400), dec!(0), sort_order)
            .unwrap()
            .with_budget_account("B10");
        account.add_posting_line(line).unwrap();
    }

    let april = account.calculate(at(2025, 4, 30, 8, 0)).await.unwrap();
    assert!(april.posting_lines().ordered()[1]
        .budget_account_values()
        .is_some());

    let march = april.calculate(at(2025, 3, 31, 8, 0)).await.unwrap();
    let lines = march.posting_lines().ordered();

    assert_eq!(lines[0].budget_account_values().unwrap().posted, dec!(400));
    assert!(lines[1].budget_account_values().is_none());
}

#[tokio::test]
async fn same_date_lines_get_distinct_running_balances() {
    let account = bank_account(
        "1010",
        &[
            (date(2025, 3, 10), dec!(100), dec!(0), 1),
            (date(2025, 3, 10), dec!(0), dec!(40), 2),
        ],
    );

    let calculated = account.calculate(at(2025, 3, 31, 0, 0)).await.unwrap();
    let lines = calculated.posting_lines().ordered();

    assert_eq!(lines[0].account_values().unwrap().balance, dec!(100));
    assert_eq!(lines[1].account_values().unwrap().balance, dec!(60));
}

#[tokio::test]
async fn budget_values_across_a_month_boundary() {
    let mut collection = BudgetInfoCollection::new();
    collection
        .add(BudgetInfo::new(2025, 3, dec!(1000), dec!(0)).unwrap())
        .unwrap();
    collection
        .add(BudgetInfo::new(2025, 4, dec!(800), dec!(0)).unwrap())
        .unwrap();

    let mut ledger = PostingLineCollection::new();
    ledger
        .add(
            PostingLine::new(1, date(2025, 3, 12), "sale", "B10", dec!(400), dec!(0), 1).unwrap(),
        )
        .unwrap();

    let calculated = collection
        .calculate_with(date(2025, 4, 15), &ledger)
        .await
        .unwrap();

    let month = calculated.values_for_month_of_status_date();
    assert_eq!((month.budget, month.posted, month.available()), (dec!(800), dec!(0), dec!(800)));

    let last_month = calculated.values_for_last_month_of_status_date();
    assert_eq!(
        (last_month.budget, last_month.posted, last_month.available()),
        (dec!(1000), dec!(400), dec!(600))
    );

    let year_to_date = calculated.values_for_year_to_date_of_status_date();
    assert_eq!(
        (year_to_date.budget, year_to_date.posted, year_to_date.available()),
        (dec!(1800), dec!(400), dec!(1400))
    );
}

#[tokio::test]
async fn credit_values_at_end_of_last_year_use_the_december_bucket() {
    let mut collection = CreditInfoCollection::new();
    collection
        .add(CreditInfo::new(2024, 12, dec!(300)).unwrap())
        .unwrap();
    collection
        .add(CreditInfo::new(2025, 2, dec!(350)).unwrap())
        .unwrap();

    let mut ledger = PostingLineCollection::new();
    ledger
        .add(
            PostingLine::new(1, date(2024, 12, 10), "deposit", "1010", dec!(90), dec!(0), 1)
                .unwrap(),
        )
        .unwrap();
    ledger
        .add(
            PostingLine::new(1, date(2025, 2, 3), "deposit", "1010", dec!(40), dec!(0), 2)
                .unwrap(),
        )
        .unwrap();

    let calculated = collection
        .calculate_with(date(2025, 2, 15), &ledger)
        .await
        .unwrap();

    let last_year = calculated.values_at_end_of_last_year_from_status_date();
    assert_eq!(last_year.credit, dec!(300));
    assert_eq!(last_year.balance, dec!(90));

    // January has no bucket, so the last-month accessor falls back to zero.
    assert_eq!(
        calculated.values_at_end_of_last_month_from_status_date(),
        Default::default()
    );
    assert_eq!(calculated.values_at_status_date().balance, dec!(130));
}

#[tokio::test]
async fn budget_values_for_last_year_sum_the_previous_calendar_year() {
    let mut collection = BudgetInfoCollection::new();
    collection
        .add(BudgetInfo::new(2024, 11, dec!(500), dec!(0)).unwrap())
        .unwrap();
    collection
        .add(BudgetInfo::new(2024, 12, dec!(700), dec!(0)).unwrap())
        .unwrap();
    collection
        .add(BudgetInfo::new(2025, 1, dec!(600), dec!(0)).unwrap())
        .unwrap();

    let mut ledger = PostingLineCollection::new();
    ledger
        .add(
            PostingLine::new(1, date(2024, 11, 20), "sale", "B10", dec!(100), dec!(0), 1).unwrap(),
        )
        .unwrap();
    ledger
        .add(
            PostingLine::new(1, date(2024, 12, 8), "sale", "B10", dec!(200), dec!(0), 2).unwrap(),
        )
        .unwrap();

    let calculated = collection
        .calculate_with(date(2025, 1, 15), &ledger)
        .await
        .unwrap();

    let last_year = calculated.values_for_last_year_of_status_date();
    assert_eq!(last_year.budget, dec!(1200));
    assert_eq!(last_year.posted, dec!(300));
    assert_eq!(last_year.available(), dec!(900));

    // Year to date covers only the January bucket of the status year.
    let year_to_date = calculated.values_for_year_to_date_of_status_date();
    assert_eq!(year_to_date.budget, dec!(600));
    assert_eq!(year_to_date.posted, dec!(0));
}

#[tokio::test]
async fn budget_account_attaches_month_bounded_snapshots() {
    let group = BudgetAccountGroup::new(10, "Operations").unwrap();
    let mut account = BudgetAccount::new(1, "B10", "Sales", group).unwrap();
    account
        .add_budget_info(BudgetInfo::new(2025, 3, dec!(1000), dec!(0)).unwrap())
        .unwrap();
    let line = PostingLine::new(1, date(2025, 3, 12), "sale", "1010", dec!(400), dec!(0), 1)
        .unwrap()
        .with_budget_account("B10");
    account.add_posting_line(line).unwrap();

    let calculated = account.calculate(at(2025, 3, 31, 10, 0)).await.unwrap();
    let values = calculated.values_for_month_of_status_date();
    assert_eq!(values.posted, dec!(400));

    let snapshot = calculated.posting_lines().ordered()[0]
        .budget_account_values()
        .unwrap();
    assert_eq!(snapshot.budget, dec!(1000));
    assert_eq!(snapshot.posted, dec!(400));
}

fn contact(number: &str, debit: Decimal, credit: Decimal) -> ContactAccount {
    let mut account = ContactAccount::new(1, number, format!("Contact {number}")).unwrap();
    account
        .add_contact_info(ContactInfo::new(2025, 3).unwrap())
        .unwrap();
    if debit != Decimal::ZERO || credit != Decimal::ZERO {
        let line = PostingLine::new(1, date(2025, 3, 5), "invoice", "1010", debit, credit, 1)
            .unwrap()
            .with_contact_account(number);
        account.add_posting_line(line).unwrap();
    }
    account
}

#[tokio::test]
async fn debtors_and_creditors_split_by_balance_sign() {
    let mut collection = ContactAccountCollection::new();
    collection.add(contact("D1", dec!(100), dec!(0))).unwrap();
    collection.add(contact("C1", dec!(0), dec!(50))).unwrap();
    collection.add(contact("Z1", dec!(0), dec!(0))).unwrap();

    let calculated = collection.calculate(at(2025, 3, 31, 18, 0)).await.unwrap();

    let debtors = calculated.find_debtors().await.unwrap();
    assert_eq!(debtors.len(), 1);
    assert!(debtors.find("D1").is_some());

    let creditors = calculated.find_creditors().await.unwrap();
    assert_eq!(creditors.len(), 1);
    assert!(creditors.find("C1").is_some());
}

#[tokio::test]
async fn partitioning_requires_a_calculated_collection() {
    let mut collection = ContactAccountCollection::new();
    collection.add(contact("D1", dec!(100), dec!(0))).unwrap();

    assert!(matches!(
        collection.find_debtors().await,
        Err(DomainError::NotCalculated(_))
    ));
}

#[tokio::test]
async fn grouping_conserves_the_collection_sum() {
    let other_group = AccountGroup::new(2, "Loans", AccountGroupType::Liabilities).unwrap();

    let mut collection = AccountCollection::new();
    collection
        .add(bank_account("1010", &[(date(2025, 3, 10), dec!(100), dec!(0), 1)]))
        .unwrap();
    collection
        .add(bank_account("1020", &[(date(2025, 3, 11), dec!(250), dec!(0), 2)]))
        .unwrap();
    let mut loan = Account::new(1, "2010", "Loan", other_group).unwrap();
    loan.add_credit_info(CreditInfo::new(2025, 3, dec!(0)).unwrap())
        .unwrap();
    loan.add_posting_line(
        PostingLine::new(1, date(2025, 3, 12), "draw", "2010", dec!(0), dec!(80), 3).unwrap(),
    )
    .unwrap();
    collection.add(loan).unwrap();

    let calculated = collection.calculate(at(2025, 3, 31, 0, 0)).await.unwrap();
    let statuses = calculated.group_by_account_group().await.unwrap();

    assert_eq!(statuses.len(), 2);
    let grouped_balance: Decimal = statuses
        .iter()
        .map(|status| status.values_at_status_date().balance)
        .sum();
    assert_eq!(grouped_balance, calculated.values_at_status_date().balance);
    assert_eq!(grouped_balance, dec!(270));
}

#[tokio::test]
async fn grouping_requires_a_calculated_collection() {
    let mut collection = AccountCollection::new();
    collection
        .add(bank_account("1010", &[(date(2025, 3, 10), dec!(100), dec!(0), 1)]))
        .unwrap();

    assert!(matches!(
        collection.group_by_account_group().await,
        Err(DomainError::NotCalculated(_))
    ));
}

#[tokio::test]
async fn group_status_recalculates_sums_with_fixed_membership() {
    let mut collection = AccountCollection::new();
    collection
        .add(bank_account(
            "1010",
            &[
                (date(2025, 3, 10), dec!(100), dec!(0), 1),
                (date(2025, 4, 2), dec!(50), dec!(0), 2),
            ],
        ))
        .unwrap();

    let march = collection.calculate(at(2025, 3, 31, 0, 0)).await.unwrap();
    let statuses = march.group_by_account_group().await.unwrap();
    assert_eq!(statuses[0].values_at_status_date().balance, dec!(100));

    let april = statuses[0].calculate(at(2025, 4, 30, 0, 0)).await.unwrap();
    assert_eq!(april.accounts().len(), statuses[0].accounts().len());
    assert_eq!(april.values_at_status_date().balance, dec!(150));
}
