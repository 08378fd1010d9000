use num_bigint::BigUint;
use test_log::test;

use mtbdd::error::MtbddError;
use mtbdd::eval::Assignment;
use mtbdd::mtbdd::Mtbdd;
use mtbdd::ops::BinaryOp;
use mtbdd::value::Value;

#[test]
fn boolean_function_evaluation() {
    let mut mgr = Mtbdd::new();
    mgr.declare(["x", "y", "z"]).unwrap();
    let x = mgr.var("x").unwrap();
    let y = mgr.var("y").unwrap();
    let z = mgr.var("z").unwrap();
    let yz = mgr.apply_or(y, z).unwrap();
    let f = mgr.apply_and(x, yz).unwrap();

    let a = Assignment::from([("x", true), ("y", false), ("z", true)]);
    assert_eq!(mgr.evaluate(f, &a).unwrap(), Value::Bool(true));
    let a = Assignment::from([("x", false), ("y", true), ("z", true)]);
    assert_eq!(mgr.evaluate(f, &a).unwrap(), Value::Bool(false));
}

#[test]
fn constant_addition() {
    let mut mgr = Mtbdd::new();
    let five = mgr.constant(5);
    let three = mgr.constant(3);
    let sum = mgr.apply(BinaryOp::Add, five, three).unwrap();
    assert!(mgr.is_terminal(sum));
    assert_eq!(mgr.terminal_value(sum), Some(Value::Int(8)));
    assert_eq!(sum, mgr.constant(8));
}

#[test]
fn constant_threshold() {
    let mut mgr = Mtbdd::new();
    let twelve = mgr.constant(12);
    let t = mgr.threshold(twelve, 10).unwrap();
    assert!(mgr.is_terminal(t));
    assert_eq!(mgr.terminal_value(t), Some(Value::Bool(true)));
}

#[test]
fn mixed_int_float_arithmetic() {
    let mut mgr = Mtbdd::new();
    let a = mgr.constant(1.5);
    let b = mgr.constant(2.5);
    let sum = mgr.apply_add(a, b).unwrap();
    // 4.0 is canonicalized to the integer terminal.
    assert_eq!(sum, mgr.constant(4));

    let big = mgr.constant(i64::MAX);
    let one = mgr.constant(1);
    let overflow = mgr.apply_add(big, one).unwrap();
    assert!(matches!(mgr.terminal_value(overflow), Some(Value::Float(_))));
}

#[test]
fn division_and_modulo_are_unsupported() {
    let mut mgr = Mtbdd::new();
    mgr.declare(["x"]).unwrap();
    let x = mgr.var("x").unwrap();
    let four = mgr.constant(4);
    let two = mgr.constant(2);
    let f = mgr.ite(x, four, two).unwrap();
    for op in [BinaryOp::Divide, BinaryOp::Modulo] {
        assert!(matches!(mgr.apply(op, f, two), Err(MtbddError::UnsupportedOperation(_))));
        assert!(matches!(mgr.apply(op, four, two), Err(MtbddError::UnsupportedOperation(_))));
    }
}

#[test]
fn undeclared_variable() {
    let mut mgr = Mtbdd::new();
    mgr.declare(["x"]).unwrap();
    assert_eq!(mgr.var("y"), Err(MtbddError::VariableNotDeclared("y".to_string())));
    let x = mgr.var("x").unwrap();
    assert!(matches!(mgr.exists(x, ["y"]), Err(MtbddError::VariableNotDeclared(_))));
    assert!(matches!(mgr.restrict(x, "y", true), Err(MtbddError::VariableNotDeclared(_))));
}

#[test]
fn pricing_configurator() {
    let mut mgr = Mtbdd::new();
    mgr.declare(["premium", "support", "analytics"]).unwrap();
    let premium = mgr.var("premium").unwrap();
    let support = mgr.var("support").unwrap();
    let analytics = mgr.var("analytics").unwrap();

    let zero = mgr.constant(0);
    let mut price = mgr.constant(100);
    for (option, cost) in [(premium, 50), (support, 20), (analytics, 35)] {
        let c = mgr.constant(cost);
        let term = mgr.ite(option, c, zero).unwrap();
        price = mgr.apply_add(price, term).unwrap();
    }
    assert_eq!(mgr.terminal_values(price).unwrap().len(), 8);

    // analytics requires premium
    let rule = mgr.apply_implies(analytics, premium).unwrap();
    let affordable = mgr.threshold(price, 171).unwrap();
    let affordable = mgr.apply_not(affordable).unwrap();
    let ok = mgr.apply_and(rule, affordable).unwrap();

    // {}, {p}, {s} and {p,s} (170); {p,a} costs 185
    assert_eq!(mgr.sat_count(ok).unwrap(), BigUint::from(4u32));

    let a = Assignment::from([("premium", true), ("support", true), ("analytics", false)]);
    assert_eq!(mgr.evaluate(price, &a).unwrap(), Value::Int(170));
    assert_eq!(mgr.evaluate(ok, &a).unwrap(), Value::Bool(true));

    // Does some valid configuration include analytics within budget?
    let with_analytics = mgr.restrict(ok, "analytics", true).unwrap();
    let any = mgr.exists(with_analytics, ["premium", "support"]).unwrap();
    assert_eq!(any, mgr.zero());
}
