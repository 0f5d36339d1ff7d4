use cohql_redis::{
    parse, Expression, FieldType, FieldTypeRegistry, QueryError, TranslationError, Translator,
    TranslatorOptions,
};

fn users() -> Translator {
    let registry = FieldTypeRegistry::new()
        .with_field("name", FieldType::Text)
        .with_field("email", FieldType::Text)
        .with_field("city", FieldType::Text)
        .with_field("age", FieldType::Numeric)
        .with_field("score", FieldType::Numeric)
        .with_field("role", FieldType::Tag)
        .with_field("status", FieldType::Tag);
    Translator::new(registry)
}

#[test]
fn test_simple_conditions() {
    let t = users();
    let cases = [
        ("name = 'John'", r#"@name:"John""#),
        ("name != 'John'", "-@name:John"),
        ("role = 'admin'", "@role:{admin}"),
        ("role <> 'admin'", "-@role:{admin}"),
        ("age = 30", "@age:[30 30]"),
        ("age != 30", "-@age:30"),
        ("age > 30", "@age:[(30 +inf]"),
        ("age >= 30", "@age:[30 +inf]"),
        ("age < 30", "@age:[-inf (30]"),
        ("age <= 30", "@age:[-inf 30]"),
        ("score >= 4.5", "@score:[4.5 +inf]"),
        ("age > '30'", "@age:[(30 +inf]"),
    ];
    for (condition, expected) in cases {
        assert_eq!(t.translate_str(condition).unwrap(), expected, "{}", condition);
    }
}

#[test]
fn test_compound_conditions() {
    let t = users();
    assert_eq!(
        t.translate_str("name = 'John' AND age > 25").unwrap(),
        r#"@name:"John" @age:[(25 +inf]"#
    );
    assert_eq!(
        t.translate_str("name = 'John' OR name = 'Jane'").unwrap(),
        r#"(@name:"John") | (@name:"Jane")"#
    );
    assert_eq!(
        t.translate_str("(role = 'admin' OR role = 'moderator') AND age >= 18")
            .unwrap(),
        "((@role:{admin}) | (@role:{moderator})) @age:[18 +inf]"
    );
    assert_eq!(
        t.translate_str("role = 'admin' AND age > 18 OR status = 'vip'")
            .unwrap(),
        "(@role:{admin} @age:[(18 +inf]) | (@status:{vip})"
    );
}

#[test]
fn test_in_and_not_in() {
    let t = users();
    assert_eq!(
        t.translate_str("age >= 10 AND score IN (1, 2, 3)").unwrap(),
        "@age:[10 +inf] (@score:[1 1]) | (@score:[2 2]) | (@score:[3 3])"
    );
    assert_eq!(
        t.translate_str("role NOT IN ('admin', 'moderator')").unwrap(),
        "-((@role:{admin}) | (@role:{moderator}))"
    );
    assert_eq!(
        t.translate_str("role IN ('admin', NULL)").unwrap(),
        "@role:{admin}"
    );
    assert_eq!(
        t.translate_str("role IN (NULL, 'null')").unwrap(),
        "@role:__NEVER_MATCH__"
    );
    assert!(matches!(
        t.translate_str("role IN ()"),
        Err(QueryError::Translation(TranslationError::EmptyValueList(_)))
    ));
}

#[test]
fn test_null_checks_and_between() {
    let t = users();
    assert_eq!(
        t.translate_str("email IS NULL").unwrap(),
        "@email:__NEVER_MATCH_NULL__"
    );
    assert_eq!(t.translate_str("email IS NOT NULL").unwrap(), "*");
    assert_eq!(
        t.translate_str("age BETWEEN 25 AND 35").unwrap(),
        "@age:[25 35]"
    );
    assert_eq!(
        t.translate_str("orderDate BETWEEN '2025-05-01' AND '2025-05-31'")
            .unwrap(),
        "@orderDate:[2025-05-01 2025-05-31]"
    );
}

#[test]
fn test_like_and_escaping() {
    let t = users();
    assert_eq!(t.translate_str("name LIKE 'J_hn'").unwrap(), r#"@name:"J?hn""#);
    assert_eq!(
        t.translate_str("email LIKE '%test.com'").unwrap(),
        r#"@email:"*test\.com""#
    );
    assert_eq!(
        t.translate_str("email = 'john@test.com'").unwrap(),
        r#"@email:"john\@test\.com""#
    );
    assert_eq!(
        t.translate_str("city = 'New York'").unwrap(),
        r#"@city:"New\ York""#
    );
    assert_eq!(
        t.translate_str("name = 'O''Connor'").unwrap(),
        r#"@name:"O'Connor""#
    );
}

#[test]
fn test_negation() {
    let t = users();
    assert_eq!(t.translate_str("NOT name = 'John'").unwrap(), r#"-@name:"John""#);
    assert_eq!(
        t.translate_str("NOT (role = 'admin' AND age > 40)").unwrap(),
        "-(@role:{admin} @age:[(40 +inf])"
    );
}

#[test]
fn test_select_prefix_is_ignored() {
    let t = users();
    assert_eq!(
        t.translate_str("SELECT * FROM users WHERE role = 'admin'")
            .unwrap(),
        "@role:{admin}"
    );
}

#[test]
fn test_errors() {
    let t = users();
    assert_eq!(
        t.translate_str("NAME = 'John'").unwrap_err().to_string(),
        TranslationError::UnknownField("NAME".to_string()).to_string()
    );
    let err = t.translate_str("age > 'twenty'").unwrap_err();
    assert!(err
        .to_string()
        .contains("Range argument must be a number, yet it is: twenty"));
    assert!(matches!(
        t.translate_str("age ~~ 'invalid'"),
        Err(QueryError::Parse(_))
    ));
    assert!(matches!(
        t.translate_str("name > 5"),
        Err(QueryError::Translation(
            TranslationError::UnsupportedConstruct(_)
        ))
    ));
}

#[test]
fn test_coalescing_tag_unions() {
    let t = users().with_options(TranslatorOptions {
        coalesce_tag_ors: true,
        ..TranslatorOptions::default()
    });
    assert_eq!(
        t.translate_str("role IN ('admin', 'moderator', 'owner')").unwrap(),
        "@role:{admin,moderator,owner}"
    );
    assert_eq!(
        t.translate_str("role = 'admin' OR role = 'owner' OR name = 'x'")
            .unwrap(),
        r#"(@role:{admin,owner}) | (@name:"x")"#
    );
}

#[test]
fn test_parsed_and_built_trees_agree() {
    let t = users();
    let built = Expression::and(
        Expression::equals("name", "John"),
        Expression::compare("age", cohql_redis::CompareOp::Gt, 25),
    );
    let parsed = parse("name = 'John' AND age > 25").unwrap();
    assert_eq!(parsed, built);
    assert_eq!(t.translate(&parsed), t.translate(&built));
}
