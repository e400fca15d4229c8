//! End-to-end scenarios through the public API.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use std::any::Any;
use std::sync::Arc;

use actx::{
    builtins, init_tracing, ActiveExprError, ActiveExpression, ActiveExpressionOptions, Expr,
    Lambda, Name, Object, Param, Property, PropertyNotifier, Type, Value,
};
use parking_lot::Mutex;
use pretty_assertions::assert_eq;

struct Account {
    owner: Mutex<Option<Arc<str>>>,
    balance: Mutex<i64>,
    notifier: PropertyNotifier,
}

impl Account {
    fn new(owner: Option<&str>, balance: i64) -> Arc<Account> {
        Arc::new(Account {
            owner: Mutex::new(owner.map(Arc::from)),
            balance: Mutex::new(balance),
            notifier: PropertyNotifier::new(),
        })
    }

    fn ty() -> Type {
        Type::object("Account")
    }

    fn owner() -> Property {
        Property::of::<Account>(Self::ty(), "Owner", Type::String, |account| {
            Ok(account.owner.lock().clone().into())
        })
    }

    fn balance() -> Property {
        Property::of::<Account>(Self::ty(), "Balance", Type::LONG, |account| {
            Ok(Value::Long(*account.balance.lock()))
        })
    }

    fn set_owner(&self, owner: Option<&str>) {
        self.notifier
            .change("Owner", || *self.owner.lock() = owner.map(Arc::from));
    }

    fn set_balance(&self, balance: i64) {
        self.notifier
            .change("Balance", || *self.balance.lock() = balance);
    }
}

impl Object for Account {
    fn type_name(&self) -> Name {
        Name::new("Account")
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn property_notifier(&self) -> Option<&PropertyNotifier> {
        Some(&self.notifier)
    }
}

/// `a => (a.Owner ?? "nobody").ToUpper() + ": " + (a.Balance > 0 ? "credit" : "debit")`
fn summary() -> Lambda {
    let a = Param::new("a", Account::ty());
    let owner = Expr::call(
        Expr::coalesce(
            Expr::property(Expr::parameter(&a), Account::owner()),
            Expr::constant("nobody"),
        ),
        builtins::string_to_upper(),
        Vec::new(),
    );
    let standing = Expr::condition(
        Expr::greater_than(
            Expr::property(Expr::parameter(&a), Account::balance()),
            Expr::constant(0i64),
        ),
        Expr::constant("credit"),
        Expr::constant("debit"),
    );
    let body = Expr::add(Expr::add(owner, Expr::constant(": ")), standing);
    Lambda::new(vec![a], body)
}

fn text(active: &ActiveExpression) -> String {
    active
        .value()
        .and_then(|value| value.as_str().map(str::to_owned))
        .expect("string value")
}

#[test]
fn summary_follows_account_changes() {
    init_tracing();
    let account = Account::new(Some("ada"), 10);
    let active = ActiveExpression::create(&summary(), &[Value::from(Arc::clone(&account))], None)
        .unwrap();
    assert_eq!(active.value_type(), Type::String);
    assert_eq!(text(&active), "ADA: credit");

    let announced = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&announced);
    let _subscription = active
        .property_notifier()
        .changed()
        .subscribe(move |change| sink.lock().push(change.name.to_string()));

    account.set_balance(-3);
    assert_eq!(text(&active), "ADA: debit");

    account.set_owner(None);
    assert_eq!(text(&active), "NOBODY: debit");

    account.set_balance(-4);
    assert_eq!(text(&active), "NOBODY: debit");
    assert_eq!(*announced.lock(), vec!["Value".to_owned(), "Value".to_owned()]);

    active.dispose().unwrap();
    account.set_owner(Some("grace"));
    assert!(active.is_disposed());
}

#[test]
fn arguments_are_validated_before_activation() {
    let lambda = summary();
    assert_eq!(
        ActiveExpression::create(&lambda, &[], None).unwrap_err(),
        ActiveExprError::ArgumentCount {
            member: Name::new("lambda"),
            expected: 1,
            found: 0,
        }
    );
    assert!(matches!(
        ActiveExpression::create(&lambda, &[Value::Int(1)], None),
        Err(ActiveExprError::ArgumentType { .. })
    ));
}

#[test]
fn frozen_options_are_shared_by_content() {
    let account = Account::new(Some("lin"), 1);
    let first_options = ActiveExpressionOptions::new();
    first_options.set_prefer_async_disposal(true).unwrap();
    let second_options = ActiveExpressionOptions::new();
    second_options.set_prefer_async_disposal(true).unwrap();

    let argument = [Value::from(Arc::clone(&account))];
    let first = ActiveExpression::create(&summary(), &argument, Some(&first_options)).unwrap();
    let second = ActiveExpression::create(&summary(), &argument, Some(&second_options)).unwrap();

    assert!(first_options.is_frozen());
    assert!(first_options.set_prefer_async_disposal(false).is_err());
    assert_eq!(first_options, second_options);
    assert!(first.ptr_eq(&second));

    let default = ActiveExpression::create(&summary(), &argument, None).unwrap();
    assert!(!default.ptr_eq(&first));
    assert_eq!(text(&default), text(&first));
}
