//! Tests for the condition expression compiler.
use tenkan::ast::{Expression, Value, VariablePath};
use tenkan::compiler::{TokenKind, compile, tokenize};
use tenkan::error::EvaluationError;

fn var(path: &str) -> Box<Expression> {
    Box::new(Expression::Variable(VariablePath::parse(path).unwrap()))
}

fn text(s: &str) -> Box<Expression> {
    Box::new(Expression::Literal(Value::Text(s.to_string())))
}

#[test]
fn test_simple_comparison() {
    let expr = compile("{{basic_info.achievement_owner}} == 'student'").unwrap();
    assert_eq!(
        expr,
        Expression::Equal(var("basic_info.achievement_owner"), text("student"))
    );
}

#[test]
fn test_and_binds_tighter_than_or() {
    let expr = compile("{{a}} == 'x' or {{b}} == 'y' and {{c}} == 'z'").unwrap();
    let Expression::Or(left, right) = expr else {
        panic!("expected `or` at the root");
    };
    assert!(matches!(*left, Expression::Equal(_, _)));
    assert!(matches!(*right, Expression::And(_, _)));
}

#[test]
fn test_not_binds_looser_than_comparison() {
    let expr = compile("not {{a}} == 'x'").unwrap();
    assert_eq!(
        expr,
        Expression::Not(Box::new(Expression::Equal(var("a"), text("x"))))
    );
}

#[test]
fn test_parentheses_override_precedence() {
    let expr = compile("({{a}} == 'x' or {{b}} == 'y') and {{c}}").unwrap();
    let Expression::And(left, right) = expr else {
        panic!("expected `and` at the root");
    };
    assert!(matches!(*left, Expression::Or(_, _)));
    assert_eq!(right, var("c"));
}

#[test]
fn test_contains_and_not_contains() {
    assert_eq!(
        compile("{{tags}} contains 'ai'").unwrap(),
        Expression::Contains(var("tags"), text("ai"))
    );
    assert_eq!(
        compile("{{tags}} not contains 'ai'").unwrap(),
        Expression::NotContains(var("tags"), text("ai"))
    );
}

#[test]
fn test_literals() {
    assert_eq!(
        compile("{{n}} >= -2.5").unwrap(),
        Expression::GreaterThanOrEqual(
            var("n"),
            Box::new(Expression::Literal(Value::Number(-2.5)))
        )
    );
    assert_eq!(
        compile("{{flag}} != True").unwrap(),
        Expression::NotEqual(var("flag"), Box::new(Expression::Literal(Value::Bool(true))))
    );
    assert_eq!(
        compile(r#"{{quote}} == "it's""#).unwrap(),
        Expression::Equal(var("quote"), text("it's"))
    );
}

#[test]
fn test_comparisons_do_not_chain() {
    let result = compile("{{a}} == {{b}} == {{c}}");
    assert!(matches!(
        result,
        Err(EvaluationError::UnexpectedToken { ref found, .. }) if found == "=="
    ));
}

#[test]
fn test_bare_names_are_rejected() {
    let result = compile("__import__ == 'os'");
    assert!(matches!(
        result,
        Err(EvaluationError::UnknownName { ref name, position: 0 }) if name == "__import__"
    ));
}

#[test]
fn test_malformed_expressions() {
    assert_eq!(compile(""), Err(EvaluationError::EmptyExpression));
    assert_eq!(compile("   "), Err(EvaluationError::EmptyExpression));
    assert_eq!(compile("{{a}} =="), Err(EvaluationError::UnexpectedEnd));
    assert_eq!(compile("({{a}} == 'x'"), Err(EvaluationError::UnexpectedEnd));
    assert!(matches!(
        compile("{{a}} == 'x')"),
        Err(EvaluationError::UnexpectedToken { .. })
    ));
    assert!(matches!(
        compile("{{a}} == 'x"),
        Err(EvaluationError::UnterminatedString(9))
    ));
    assert!(matches!(
        compile("{{a == 'x'"),
        Err(EvaluationError::UnterminatedVariable(0))
    ));
    assert!(matches!(
        compile("{{a}} = 'x'"),
        Err(EvaluationError::UnexpectedCharacter { found: '=', .. })
    ));
}

#[test]
fn test_tokenize_reports_positions() {
    let tokens = tokenize("{{a}} not contains 'x'").unwrap();
    let kinds: Vec<&TokenKind> = tokens.iter().map(|t| &t.kind).collect();
    assert_eq!(kinds.len(), 4);
    assert_eq!(kinds[1], &TokenKind::Not);
    assert_eq!(kinds[2], &TokenKind::Contains);
    assert_eq!(tokens[3].position, 19);
}
