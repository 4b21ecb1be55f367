//! End-to-end grammars driven through the `Grammar` trait.

use descent::{Grammar, Number, Options, ParseResult, Parser, PatternOverrides};

#[derive(Debug, PartialEq)]
enum Value {
    Int(i64),
    Float(f64),
    Str(String),
    Sym(String),
    List(Vec<Value>),
}

/// A small s-expression language with `;` line comments.
struct Sexpr;

impl Grammar for Sexpr {
    type Output = Value;

    fn parse(&self, p: &mut Parser) -> ParseResult<Value> {
        sexpr_value(p)
    }

    fn patterns(&self) -> PatternOverrides {
        PatternOverrides {
            comment: Some(r";[^\n]*".to_string()),
            ..PatternOverrides::default()
        }
    }
}

fn sexpr_value(p: &mut Parser) -> ParseResult<Value> {
    p.any_of(&mut [
        &mut |p: &mut Parser| {
            p.scope_of(Some("("), ")", |p| p.sequence_of(sexpr_value).map(Value::List))
        },
        &mut |p: &mut Parser| p.token_string().map(Value::Str),
        &mut |p: &mut Parser| {
            p.token_number().map(|n| match n {
                Number::Int(i) => Value::Int(i),
                Number::Float(f) => Value::Float(f),
            })
        },
        &mut |p: &mut Parser| p.token_ident().map(Value::Sym),
    ])
}

#[test]
fn sexpr_parses_nested_forms() {
    let value = Sexpr
        .parse_string("(add 1 2.5 \"x\" (neg 3)) ; done")
        .unwrap();
    assert_eq!(
        value,
        Value::List(vec![
            Value::Sym("add".to_string()),
            Value::Int(1),
            Value::Float(2.5),
            Value::Str("x".to_string()),
            Value::List(vec![Value::Sym("neg".to_string()), Value::Int(3)]),
        ])
    );
}

#[test]
fn sexpr_comments_are_skipped_between_tokens() {
    let value = Sexpr
        .parse_string("( one ; first\n  two ) ; trailing")
        .unwrap();
    assert_eq!(
        value,
        Value::List(vec![
            Value::Sym("one".to_string()),
            Value::Sym("two".to_string()),
        ])
    );
}

#[test]
fn caller_options_beat_grammar_overrides() {
    // The caller switches the comment style; the grammar's `;` comments
    // are now plain input and fail the parse.
    let hash_comments = Options {
        patterns: PatternOverrides {
            comment: Some(r"#[^\n]*".to_string()),
            ..PatternOverrides::default()
        },
        ..Options::default()
    };
    assert!(Sexpr
        .parse_string_with("(a b) # note", hash_comments.clone())
        .is_ok());
    assert!(Sexpr
        .parse_string_with("(a b) ; note", hash_comments)
        .is_err());
}

/// An integer grammar that opts into `0o` octal literals.
struct OctalInts;

impl Grammar for OctalInts {
    type Output = Vec<i64>;

    fn parse(&self, p: &mut Parser) -> ParseResult<Vec<i64>> {
        p.list_of(",", |p| p.token_int())
    }

    fn accept_0o_oct(&self) -> bool {
        true
    }
}

#[test]
fn grammar_level_octal_flag_applies() {
    assert_eq!(OctalInts.parse_string("0o17, 8, 0x10").unwrap(), vec![15, 8, 16]);
}

#[test]
fn grammars_drive_the_streaming_reader() {
    let mut pending = vec![" 2)", "(1"];
    let value = Sexpr
        .parse_reader(move || pending.pop().map(String::from))
        .unwrap();
    assert_eq!(value, Value::List(vec![Value::Int(1), Value::Int(2)]));

    struct Csv;
    impl Grammar for Csv {
        type Output = Vec<i64>;
        fn parse(&self, p: &mut Parser) -> ParseResult<Vec<i64>> {
            p.list_of(",", |p| p.token_int())
        }
    }
    let mut pending = vec![" 3", "1, 2,"];
    assert_eq!(
        Csv.parse_reader(move || pending.pop().map(String::from))
            .unwrap(),
        vec![1, 2, 3]
    );
}

/// Directives with committed keyword heads.
#[derive(Debug, PartialEq)]
enum Directive {
    Set(String, String),
    Flag(String),
}

struct Directives;

impl Grammar for Directives {
    type Output = Vec<Directive>;

    fn parse(&self, p: &mut Parser) -> ParseResult<Vec<Directive>> {
        p.sequence_of(|p| {
            p.any_of(&mut [
                &mut |p: &mut Parser| {
                    p.token_kw(&["set"])?;
                    p.commit()?;
                    let name = p.token_ident()?;
                    let value = p.token_string()?;
                    Ok(Directive::Set(name, value))
                },
                &mut |p: &mut Parser| {
                    p.token_kw(&["flag"])?;
                    p.commit()?;
                    p.token_ident().map(Directive::Flag)
                },
            ])
        })
    }
}

#[test]
fn directives_parse_in_sequence() {
    let parsed = Directives
        .parse_string("set colour \"blue\"\nflag fast\n")
        .unwrap();
    assert_eq!(
        parsed,
        vec![
            Directive::Set("colour".to_string(), "blue".to_string()),
            Directive::Flag("fast".to_string()),
        ]
    );
}

#[test]
fn commit_binds_the_innermost_frame() {
    // The committed keyword head hardens the alternation, but the
    // enclosing sequence frame is separate and still rolls back, leaving
    // the bad directive as trailing input.
    let err = Directives.parse_string("set 42").unwrap_err();
    assert_eq!(err.failure().unwrap().message, "Expected end of input");
    assert_eq!(err.failure().unwrap().column, 0);
}
