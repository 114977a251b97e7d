use accounting_core::accounts::{Account, AccountGroup, AccountGroupType, ContactAccount};
use accounting_core::info::CreditInfo;
use accounting_core::{Accounting, Deletable, Protectable};
use rust_decimal_macros::dec;

fn group() -> AccountGroup {
    AccountGroup::new(1, "Bank accounts", AccountGroupType::Assets).unwrap()
}

#[test]
fn deletion_toggles_freely_before_protection() {
    let mut account = Account::new(1, "1010", "Bank", group()).unwrap();
    assert!(!account.deletable());

    account.allow_deletion();
    assert!(account.deletable());

    account.disallow_deletion();
    assert!(!account.deletable());
}

#[test]
fn protection_is_permanent() {
    let mut account = Account::new(1, "1010", "Bank", group()).unwrap();
    account.allow_deletion();

    account.apply_protection();
    assert!(account.is_protected());
    assert!(!account.deletable());

    account.allow_deletion();
    assert!(!account.deletable());
    assert!(account.is_protected());

    // Reapplying is a no-op, not an error.
    account.apply_protection();
    assert!(account.is_protected());
}

#[test]
fn protection_cascades_into_info_buckets() {
    let mut account = Account::new(1, "1010", "Bank", group()).unwrap();
    account
        .add_credit_info(CreditInfo::new(2025, 3, dec!(500)).unwrap())
        .unwrap();

    account.apply_protection();

    let bucket = account.credit_infos().first().unwrap();
    assert!(bucket.is_protected());
    assert!(!bucket.deletable());
}

#[test]
fn accounting_protection_cascades_through_every_collection() {
    let mut accounting = Accounting::new(1, "Books").unwrap();
    accounting
        .add_account(Account::new(1, "1010", "Bank", group()).unwrap())
        .unwrap();
    accounting
        .add_contact_account(ContactAccount::new(1, "D1", "Debtor").unwrap())
        .unwrap();

    accounting.apply_protection();

    assert!(accounting.is_protected());
    let account = accounting.accounts().find("1010").unwrap();
    assert!(account.is_protected());
    let contact = accounting.contact_accounts().find("D1").unwrap();
    assert!(contact.is_protected());
}

#[test]
fn info_buckets_are_independently_deletable() {
    let mut info = CreditInfo::new(2025, 6, dec!(0)).unwrap();
    assert!(!info.deletable());

    info.allow_deletion();
    assert!(info.deletable());

    info.apply_protection();
    info.allow_deletion();
    assert!(!info.deletable());
}
