//! Whole-pipeline tests: sugared AST in, value and printed output out.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use pretty_assertions::assert_eq;
use rpalc::{
    buffer_handler, silent_handler, BinaryOp, ErrorKind, Name, Node, Outcome, Pipeline,
    RpalResult, StringInterner, Tag, Token, UnaryOp, Value,
};

fn id(name: Name) -> Node {
    Node::identifier(name)
}

fn tag(tag: Tag, children: Vec<Node>) -> Node {
    Node::new(tag, children)
}

fn run(names: &StringInterner, ast: Node) -> RpalResult<Outcome> {
    Pipeline::new(names).print_handler(silent_handler()).run(ast)
}

/// Run and return the printed output along with the outcome.
fn run_printing(names: &StringInterner, ast: Node) -> (Outcome, String) {
    let out = buffer_handler();
    let outcome = Pipeline::new(names)
        .print_handler(out.clone())
        .run(ast)
        .unwrap();
    (outcome, out.get_output())
}

#[test]
fn let_in_addition() {
    let names = StringInterner::new();
    let x = names.intern("x");
    // let x = 3 in x + 4
    let ast = tag(
        Tag::Let,
        vec![
            Node::equals(id(x), Node::integer(3)),
            Node::binary(BinaryOp::Add, id(x), Node::integer(4)),
        ],
    );
    let outcome = run(&names, ast).unwrap();
    assert_eq!(outcome.value, Value::int(7));
    assert_eq!(outcome.structures, 2);
    assert_eq!(outcome.environments, 2);
}

#[test]
fn recursive_factorial_of_five() {
    let names = StringInterner::new();
    let fact = names.intern("Fact");
    let n = names.intern("n");
    // let rec Fact n = n eq 0 -> 1 | n * Fact (n - 1) in Print (Fact 5)
    let body = tag(
        Tag::Arrow,
        vec![
            Node::binary(BinaryOp::Eq, id(n), Node::integer(0)),
            Node::integer(1),
            Node::binary(
                BinaryOp::Mul,
                id(n),
                Node::gamma(id(fact), Node::binary(BinaryOp::Sub, id(n), Node::integer(1))),
            ),
        ],
    );
    let ast = tag(
        Tag::Let,
        vec![
            tag(Tag::Rec, vec![tag(Tag::FcnForm, vec![id(fact), id(n), body])]),
            Node::gamma(
                Node::identifier(Name::PRINT),
                Node::gamma(id(fact), Node::integer(5)),
            ),
        ],
    );
    let (outcome, printed) = run_printing(&names, ast);
    assert_eq!(outcome.value, Value::int(120));
    assert_eq!(printed, "120\n");
}

#[test]
fn aug_on_tuple_and_nil() {
    let names = StringInterner::new();
    let ast = Node::gamma(
        Node::identifier(Name::PRINT),
        tag(
            Tag::Tau,
            vec![
                Node::binary(
                    BinaryOp::Aug,
                    tag(
                        Tag::Tau,
                        vec![Node::integer(1), Node::integer(2), Node::integer(3)],
                    ),
                    Node::integer(4),
                ),
                Node::binary(BinaryOp::Aug, Node::leaf(Token::Nil), Node::integer(1)),
            ],
        ),
    );
    let (_, printed) = run_printing(&names, ast);
    assert_eq!(printed, "((1, 2, 3, 4), (1))\n");
}

#[test]
fn simultaneous_definitions() {
    let names = StringInterner::new();
    let a = names.intern("a");
    let b = names.intern("b");
    // let a = 10 and b = 3 in a - b
    let ast = tag(
        Tag::Let,
        vec![
            tag(
                Tag::And,
                vec![
                    Node::equals(id(a), Node::integer(10)),
                    Node::equals(id(b), Node::integer(3)),
                ],
            ),
            Node::binary(BinaryOp::Sub, id(a), id(b)),
        ],
    );
    assert_eq!(run(&names, ast).unwrap().value, Value::int(7));
}

#[test]
fn within_scopes_the_first_definition() {
    let names = StringInterner::new();
    let c = names.intern("c");
    let f = names.intern("f");
    let x = names.intern("x");
    // let c = 3 within f x = x * c in f 4
    let ast = tag(
        Tag::Let,
        vec![
            tag(
                Tag::Within,
                vec![
                    Node::equals(id(c), Node::integer(3)),
                    tag(
                        Tag::FcnForm,
                        vec![id(f), id(x), Node::binary(BinaryOp::Mul, id(x), id(c))],
                    ),
                ],
            ),
            Node::gamma(id(f), Node::integer(4)),
        ],
    );
    assert_eq!(run(&names, ast).unwrap().value, Value::int(12));
}

#[test]
fn infix_application() {
    let names = StringInterner::new();
    let plus = names.intern("Plus");
    let x = names.intern("x");
    let y = names.intern("y");
    // (2 @Plus 5) where Plus x y = x + y
    let ast = tag(
        Tag::Where,
        vec![
            tag(Tag::At, vec![Node::integer(2), id(plus), Node::integer(5)]),
            tag(
                Tag::FcnForm,
                vec![id(plus), id(x), id(y), Node::binary(BinaryOp::Add, id(x), id(y))],
            ),
        ],
    );
    assert_eq!(run(&names, ast).unwrap().value, Value::int(7));
}

#[test]
fn string_builtins() {
    let names = StringInterner::new();
    let s = names.intern("s");
    // let s = 'rpal' in Conc (Stern s) (Stem s)
    let ast = tag(
        Tag::Let,
        vec![
            Node::equals(id(s), Node::string("rpal")),
            Node::gamma(
                Node::gamma(
                    Node::identifier(Name::CONC),
                    Node::gamma(Node::identifier(Name::STERN), id(s)),
                ),
                Node::gamma(Node::identifier(Name::STEM), id(s)),
            ),
        ],
    );
    assert_eq!(run(&names, ast).unwrap().value, Value::string("palr"));
}

#[test]
fn recursive_tuple_sum() {
    let names = StringInterner::new();
    let sum = names.intern("Sum");
    let t = names.intern("T");
    let n = names.intern("N");
    // let rec Sum (T, N) = N eq 0 -> 0 | T N + Sum (T, N - 1)
    // in Sum ((5, 6, 7), Order (5, 6, 7))
    let body = tag(
        Tag::Arrow,
        vec![
            Node::binary(BinaryOp::Eq, id(n), Node::integer(0)),
            Node::integer(0),
            Node::binary(
                BinaryOp::Add,
                Node::gamma(id(t), id(n)),
                Node::gamma(
                    id(sum),
                    tag(
                        Tag::Tau,
                        vec![id(t), Node::binary(BinaryOp::Sub, id(n), Node::integer(1))],
                    ),
                ),
            ),
        ],
    );
    let tuple = || {
        tag(
            Tag::Tau,
            vec![Node::integer(5), Node::integer(6), Node::integer(7)],
        )
    };
    let ast = tag(
        Tag::Let,
        vec![
            tag(
                Tag::Rec,
                vec![tag(
                    Tag::FcnForm,
                    vec![id(sum), tag(Tag::Comma, vec![id(t), id(n)]), body],
                )],
            ),
            Node::gamma(
                id(sum),
                tag(
                    Tag::Tau,
                    vec![tuple(), Node::gamma(Node::identifier(Name::ORDER), tuple())],
                ),
            ),
        ],
    );
    assert_eq!(run(&names, ast).unwrap().value, Value::int(18));
}

#[test]
fn print_operator_and_closures_format() {
    let names = StringInterner::new();
    let x = names.intern("x");
    // print (fn x. x)
    let ast = Node::new(UnaryOp::Print, vec![Node::lambda(id(x), id(x))]);
    let (outcome, printed) = run_printing(&names, ast);
    assert_eq!(printed, "[lambda closure: x: 1]\n");
    assert!(matches!(outcome.value, Value::Closure(_)));
}

#[test]
fn bindings_are_visible_to_programs() {
    let names = StringInterner::new();
    let limit = names.intern("Limit");
    let ast = Node::binary(BinaryOp::Ls, Node::integer(3), id(limit));
    let outcome = Pipeline::new(&names)
        .print_handler(silent_handler())
        .binding(limit, Value::int(10))
        .run(ast)
        .unwrap();
    assert_eq!(outcome.value, Value::Bool(true));
}

#[test]
fn compile_exposes_the_control_table() {
    let names = StringInterner::new();
    let x = names.intern("x");
    let ast = tag(
        Tag::Let,
        vec![
            Node::equals(id(x), Node::integer(3)),
            Node::binary(BinaryOp::Add, id(x), Node::integer(4)),
        ],
    );
    let table = Pipeline::new(&names).compile(ast).unwrap();
    assert_eq!(table.dump(&names), "δ0: gamma λ1[x] 3\nδ1: + x 4\n");
}

#[test]
fn malformed_sugar_is_reported_before_execution() {
    let names = StringInterner::new();
    let out = buffer_handler();
    // let with a single child, wrapped in a print that must not run
    let ast = Node::gamma(
        Node::identifier(Name::PRINT),
        tag(Tag::Let, vec![Node::integer(1)]),
    );
    let err = Pipeline::new(&names)
        .print_handler(out.clone())
        .run(ast)
        .unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::MalformedNode { .. }));
    assert_eq!(out.get_output(), "");
}

/// `let rec f n = n eq 0 -> nil | (n, f (n - 1)) in <body f>`
fn nested_list_program(names: &StringInterner, body: impl FnOnce(Node) -> Node) -> Node {
    let f = names.intern("f");
    let n = names.intern("n");
    let def = tag(
        Tag::Arrow,
        vec![
            Node::binary(BinaryOp::Eq, id(n), Node::integer(0)),
            Node::leaf(Token::Nil),
            tag(
                Tag::Tau,
                vec![
                    id(n),
                    Node::gamma(id(f), Node::binary(BinaryOp::Sub, id(n), Node::integer(1))),
                ],
            ),
        ],
    );
    tag(
        Tag::Let,
        vec![
            tag(Tag::Rec, vec![tag(Tag::FcnForm, vec![id(f), id(n), def])]),
            body(id(f)),
        ],
    )
}

#[test]
fn nested_lists_print_innermost_last() {
    let names = StringInterner::new();
    let ast = nested_list_program(&names, |f| {
        Node::gamma(Node::identifier(Name::PRINT), Node::gamma(f, Node::integer(3)))
    });
    let (_, printed) = run_printing(&names, ast);
    assert_eq!(printed, "(3, (2, (1, nil)))\n");
}

#[test]
fn deep_recursion_builds_and_frees_a_long_list() {
    let names = StringInterner::new();
    let ast = nested_list_program(&names, |f| {
        Node::gamma(id(Name::ORDER), Node::gamma(f, Node::integer(100_000)))
    });
    let outcome = run(&names, ast).unwrap();
    assert_eq!(outcome.value, Value::int(2));
}

#[test]
fn runtime_errors_surface_with_their_kind() {
    let names = StringInterner::new();
    let ast = Node::binary(BinaryOp::Div, Node::integer(-7), Node::integer(0));
    let err = run(&names, ast).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::DivisionByZero);
    assert_eq!(err.to_string(), "division by zero");
}

#[test]
fn step_budget_is_forwarded() {
    let names = StringInterner::new();
    let f = names.intern("f");
    let x = names.intern("x");
    let ast = tag(
        Tag::Let,
        vec![
            tag(
                Tag::Rec,
                vec![tag(Tag::FcnForm, vec![id(f), id(x), Node::gamma(id(f), id(x))])],
            ),
            Node::gamma(id(f), Node::integer(0)),
        ],
    );
    let err = Pipeline::new(&names)
        .print_handler(silent_handler())
        .step_budget(500)
        .run(ast)
        .unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::StepBudgetExceeded { budget: 500 });
}

#[test]
fn init_tracing_is_idempotent() {
    rpalc::init_tracing();
    rpalc::init_tracing();
}
